//! Position cursors over a [`DynamicArray`](crate::DynamicArray).
//!
//! A cursor is a position inside the live elements of an array, or one past
//! the end:
//!
//! ```text
//!            begin()                 end()
//!              │                       │
//!              ▼                       ▼
//!   ┌──────┬──────┬──────┬──────┐ ┌ ─ ─ ─ ┐
//!   │  e0  │  e1  │  e2  │  e3  │   (end)
//!   └──────┴──────┴──────┴──────┘ └ ─ ─ ─ ┘
//!      0      1      2      3        4       ◄── position
//! ```
//!
//! Cursors borrow the array, so anything that can reallocate or shift
//! elements (push, insert, remove, reserve, ...) cannot run while a cursor is
//! alive. Stepping outside `[begin, end]` is allowed; dereferencing anywhere
//! but `[begin, end)` panics.

use std::{
  fmt,
  ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign},
  ptr,
};

#[cold]
#[inline(never)]
#[track_caller]
fn out_of_view(
  position: isize,
  len: usize,
) -> ! {
  panic!("index out of bounds: cursor at position {position} dereferenced over {len} elements")
}

#[inline]
#[track_caller]
fn checked(
  position: isize,
  len: usize,
) -> usize {
  match usize::try_from(position) {
    Ok(index) if index < len => index,
    _ => out_of_view(position, len),
  }
}

/// Read-only cursor.
pub struct Cursor<'a, T> {
  view: &'a [T],
  position: isize,
}

impl<'a, T> Cursor<'a, T> {
  pub(crate) fn new(
    view: &'a [T],
    position: usize,
  ) -> Self {
    Self {
      view,
      position: position as isize,
    }
  }

  /// Pre-increment.
  pub fn inc(&mut self) -> &mut Self {
    self.position += 1;
    self
  }

  /// Post-increment: steps forward and returns the previous position.
  pub fn post_inc(&mut self) -> Self {
    let previous = *self;
    self.position += 1;
    previous
  }

  /// Pre-decrement.
  pub fn dec(&mut self) -> &mut Self {
    self.position -= 1;
    self
  }

  /// Post-decrement: steps back and returns the previous position.
  pub fn post_dec(&mut self) -> Self {
    let previous = *self;
    self.position -= 1;
    previous
  }

  /// The element `k` slots away, i.e. `*(cursor + k)`.
  #[track_caller]
  pub fn at(
    &self,
    k: isize,
  ) -> &'a T {
    &self.view[checked(self.position + k, self.view.len())]
  }

  /// The referenced element, or `None` outside `[begin, end)`.
  pub fn get(&self) -> Option<&'a T> {
    usize::try_from(self.position)
      .ok()
      .and_then(|index| self.view.get(index))
  }

  pub fn offset_from_start(&self) -> isize {
    self.position
  }

  pub fn is_end(&self) -> bool {
    self.position == self.view.len() as isize
  }

  /// Iterates from this cursor up to (not including) `end`.
  ///
  /// # Panics
  ///
  /// If `end` belongs to a different array, or unless
  /// `begin <= self <= end <= array.end()`.
  #[track_caller]
  pub fn to(
    self,
    end: Cursor<'a, T>,
  ) -> CursorRange<'a, T> {
    assert!(
      ptr::eq(self.view, end.view),
      "cursors belong to different arrays"
    );
    let len = self.view.len() as isize;
    assert!(
      0 <= self.position && self.position <= end.position && end.position <= len,
      "cursor range {}..{} out of bounds for {len} elements",
      self.position,
      end.position
    );
    CursorRange { front: self, back: end }
  }
}

impl<T> Clone for Cursor<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Cursor<'_, T> {}

/// Two cursors are equal when they view the same storage at the same
/// position. Arrays without storage (unallocated, or of a zero-sized `T`)
/// share one dangling address, so cursors into two such arrays compare equal.
impl<T> PartialEq for Cursor<'_, T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    ptr::eq(self.view.as_ptr(), other.view.as_ptr()) && self.position == other.position
  }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Cursor")
      .field("position", &self.position)
      .field("len", &self.view.len())
      .finish()
  }
}

impl<T> Deref for Cursor<'_, T> {
  type Target = T;

  #[track_caller]
  fn deref(&self) -> &T {
    self.at(0)
  }
}

impl<T> Index<isize> for Cursor<'_, T> {
  type Output = T;

  #[track_caller]
  fn index(
    &self,
    k: isize,
  ) -> &T {
    self.at(k)
  }
}

impl<T> Add<isize> for Cursor<'_, T> {
  type Output = Self;

  fn add(
    mut self,
    k: isize,
  ) -> Self {
    self.position += k;
    self
  }
}

impl<T> Sub<isize> for Cursor<'_, T> {
  type Output = Self;

  fn sub(
    mut self,
    k: isize,
  ) -> Self {
    self.position -= k;
    self
  }
}

/// Distance between two cursors of the same array.
impl<'a, T> Sub for Cursor<'a, T> {
  type Output = isize;

  fn sub(
    self,
    other: Cursor<'a, T>,
  ) -> isize {
    self.position - other.position
  }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
  fn add_assign(
    &mut self,
    k: isize,
  ) {
    self.position += k;
  }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
  fn sub_assign(
    &mut self,
    k: isize,
  ) {
    self.position -= k;
  }
}

/// The elements between two read-only cursors.
pub struct CursorRange<'a, T> {
  front: Cursor<'a, T>,
  back: Cursor<'a, T>,
}

impl<'a, T> Iterator for CursorRange<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<&'a T> {
    if self.front.position >= self.back.position {
      return None;
    }
    let item = self.front.at(0);
    self.front.inc();
    Some(item)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = (self.back.position - self.front.position) as usize;
    (remaining, Some(remaining))
  }
}

impl<'a, T> DoubleEndedIterator for CursorRange<'a, T> {
  fn next_back(&mut self) -> Option<&'a T> {
    if self.front.position >= self.back.position {
      return None;
    }
    self.back.dec();
    Some(self.back.at(0))
  }
}

impl<T> ExactSizeIterator for CursorRange<'_, T> {}

/// Mutable cursor.
///
/// Unlike [`Cursor`] it is not `Copy`, so there is no post-increment: two
/// live mutable cursors over the same elements would alias. Use
/// [`reborrow`](CursorMut::reborrow) to hand out a temporary copy instead.
pub struct CursorMut<'a, T> {
  view: &'a mut [T],
  position: isize,
}

impl<'a, T> CursorMut<'a, T> {
  pub(crate) fn new(
    view: &'a mut [T],
    position: usize,
  ) -> Self {
    Self {
      view,
      position: position as isize,
    }
  }

  pub fn inc(&mut self) -> &mut Self {
    self.position += 1;
    self
  }

  pub fn dec(&mut self) -> &mut Self {
    self.position -= 1;
    self
  }

  #[track_caller]
  pub fn at(
    &self,
    k: isize,
  ) -> &T {
    &self.view[checked(self.position + k, self.view.len())]
  }

  #[track_caller]
  pub fn at_mut(
    &mut self,
    k: isize,
  ) -> &mut T {
    let index = checked(self.position + k, self.view.len());
    &mut self.view[index]
  }

  pub fn get(&self) -> Option<&T> {
    usize::try_from(self.position)
      .ok()
      .and_then(|index| self.view.get(index))
  }

  pub fn get_mut(&mut self) -> Option<&mut T> {
    usize::try_from(self.position)
      .ok()
      .and_then(|index| self.view.get_mut(index))
  }

  pub fn offset_from_start(&self) -> isize {
    self.position
  }

  pub fn is_end(&self) -> bool {
    self.position == self.view.len() as isize
  }

  /// A shorter-lived mutable cursor at the same position.
  pub fn reborrow(&mut self) -> CursorMut<'_, T> {
    CursorMut {
      view: &mut *self.view,
      position: self.position,
    }
  }

  /// A read-only cursor at the same position.
  pub fn as_cursor(&self) -> Cursor<'_, T> {
    Cursor {
      view: &*self.view,
      position: self.position,
    }
  }
}

/// Same identity rule as [`Cursor`]'s equality.
impl<T> PartialEq for CursorMut<'_, T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    ptr::eq(self.view.as_ptr(), other.view.as_ptr()) && self.position == other.position
  }
}

impl<T> Eq for CursorMut<'_, T> {}

impl<T> fmt::Debug for CursorMut<'_, T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("CursorMut")
      .field("position", &self.position)
      .field("len", &self.view.len())
      .finish()
  }
}

impl<T> Deref for CursorMut<'_, T> {
  type Target = T;

  #[track_caller]
  fn deref(&self) -> &T {
    self.at(0)
  }
}

impl<T> DerefMut for CursorMut<'_, T> {
  #[track_caller]
  fn deref_mut(&mut self) -> &mut T {
    self.at_mut(0)
  }
}

impl<T> Index<isize> for CursorMut<'_, T> {
  type Output = T;

  #[track_caller]
  fn index(
    &self,
    k: isize,
  ) -> &T {
    self.at(k)
  }
}

impl<T> IndexMut<isize> for CursorMut<'_, T> {
  #[track_caller]
  fn index_mut(
    &mut self,
    k: isize,
  ) -> &mut T {
    self.at_mut(k)
  }
}

impl<T> Add<isize> for CursorMut<'_, T> {
  type Output = Self;

  fn add(
    mut self,
    k: isize,
  ) -> Self {
    self.position += k;
    self
  }
}

impl<T> Sub<isize> for CursorMut<'_, T> {
  type Output = Self;

  fn sub(
    mut self,
    k: isize,
  ) -> Self {
    self.position -= k;
    self
  }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
  fn add_assign(
    &mut self,
    k: isize,
  ) {
    self.position += k;
  }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
  fn sub_assign(
    &mut self,
    k: isize,
  ) {
    self.position -= k;
  }
}

#[cfg(test)]
mod tests {
  use crate::DynamicArray;

  #[test]
  fn test_forward_walk() {
    let array = DynamicArray::from([1, 2, 3, 4]);
    let mut seen = Vec::new();

    let mut it = array.begin();
    while it != array.end() {
      seen.push(*it);
      it.inc();
    }

    assert_eq!(seen, [1, 2, 3, 4]);
  }

  #[test]
  fn test_backward_walk() {
    let array = DynamicArray::from(['a', 'b', 'c']);
    let mut seen = String::new();

    let mut it = array.cend();
    while it != array.cbegin() {
      it.dec();
      seen.push(*it);
    }

    assert_eq!(seen, "cba");
  }

  #[test]
  fn test_post_step_returns_previous() {
    let array = DynamicArray::from([10, 20, 30]);
    let mut it = array.begin();

    let before = it.post_inc();
    assert_eq!(*before, 10);
    assert_eq!(*it, 20);

    let before = it.post_dec();
    assert_eq!(*before, 20);
    assert_eq!(*it, 10);
  }

  #[test]
  fn test_random_access() {
    let array = DynamicArray::from([5, 6, 7, 8, 9]);
    let begin = array.begin();

    assert_eq!(*(begin + 3), 8);
    assert_eq!(begin[4], 9);
    assert_eq!(*((array.end() - 1) - 1), 8);
    assert_eq!(array.end() - array.begin(), 5);
    assert_eq!((begin + 2).at(-1), &6);

    let mut it = begin;
    it += 4;
    it -= 1;
    assert_eq!(it.offset_from_start(), 3);
    assert_eq!(it, begin + 3);
    assert_ne!(it, begin);
  }

  #[test]
  fn test_member_passthrough() {
    let array = DynamicArray::from([String::from("abc"), String::from("de")]);

    assert_eq!(array.begin().len(), 3);
    assert_eq!((array.begin() + 1).len(), 2);
  }

  #[test]
  fn test_end_is_not_dereferenceable() {
    let array = DynamicArray::from([1]);

    assert!(array.end().is_end());
    assert_eq!(array.end().get(), None);
    assert_eq!((array.begin() - 1).get(), None);
  }

  #[test]
  #[should_panic(expected = "index out of bounds")]
  fn test_deref_end_panics() {
    let array = DynamicArray::from([1, 2]);
    let _value: i32 = *array.end();
  }

  #[test]
  fn test_cursors_of_different_arrays_differ() {
    let a = DynamicArray::from([1, 2]);
    let b = a.clone();

    assert_ne!(a.begin(), b.begin());
  }

  #[test]
  fn test_range_iterates_both_ways() {
    let array = DynamicArray::from([1, 2, 3, 4, 5]);

    let forward: Vec<_> = (array.begin() + 1).to(array.end() - 1).copied().collect();
    assert_eq!(forward, [2, 3, 4]);

    let backward: Vec<_> = array.cbegin().to(array.cend()).rev().copied().collect();
    assert_eq!(backward, [5, 4, 3, 2, 1]);

    assert_eq!(array.begin().to(array.end()).len(), 5);
  }

  #[test]
  fn test_range_len_matches_yield() {
    let array = DynamicArray::from([1, 2, 3, 4]);

    for front in 0..=4 {
      for back in front..=4 {
        let range = (array.begin() + front).to(array.begin() + back);
        let claimed = range.len();
        assert_eq!(range.count(), claimed);
        assert_eq!(claimed, (back - front) as usize);
      }
    }
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn test_range_before_begin_panics() {
    let array = DynamicArray::from([1, 2, 3]);
    let _ = (array.begin() - 1).to(array.end());
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn test_range_past_end_panics() {
    let array = DynamicArray::from([1, 2, 3]);
    let _ = array.begin().to(array.end() + 2);
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn test_reversed_range_panics() {
    let array = DynamicArray::from([1, 2, 3]);
    let _ = array.end().to(array.begin());
  }

  #[test]
  fn test_storage_less_arrays_share_cursor_identity() {
    let a: DynamicArray<u8> = DynamicArray::unallocated();
    let b: DynamicArray<u8> = DynamicArray::unallocated();

    assert_eq!(a.begin(), b.begin());
  }

  #[test]
  fn test_empty_range() {
    let array: DynamicArray<u8> = DynamicArray::new();

    assert_eq!(array.begin(), array.end());
    assert_eq!(array.begin().to(array.end()).next(), None);
  }

  #[test]
  fn test_mutable_cursor() {
    let mut array = DynamicArray::from([1, 2, 3]);

    let mut it = array.begin_mut();
    while !it.is_end() {
      *it *= 10;
      it.inc();
    }

    assert_eq!(array, [10, 20, 30]);

    let mut it = array.begin_mut() + 1;
    it[1] += 5;
    *it.at_mut(-1) = 0;
    it.dec();
    assert_eq!(*it, 0);
    assert_eq!(it.as_cursor().at(2), &35);

    {
      let mut copy = it.reborrow();
      copy += 1;
      *copy = 21;
    }
    assert_eq!(it[1], 21);

    assert_eq!(array, [0, 21, 35]);
  }

  #[test]
  fn test_mutable_end_cursor() {
    let mut array = DynamicArray::from([1, 2]);
    let mut end = array.end_mut();

    assert!(end.is_end());
    assert!(end.get_mut().is_none());
    end.dec();
    *end.get_mut().unwrap() = 9;

    assert_eq!(array, [1, 9]);
  }
}
