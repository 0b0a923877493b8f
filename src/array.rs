use std::{
  alloc::{Layout, handle_alloc_error},
  fmt, mem,
  ops::{Deref, DerefMut, Index, IndexMut},
  ptr, slice,
};

use crate::{
  core_info, core_trace, core_warn,
  cursor::{Cursor, CursorMut},
  error::ArrayError,
  iter::IntoIter,
  raw::RawBlock,
};

/// Capacity preallocated by [`DynamicArray::new`].
pub const DEFAULT_CAPACITY: usize = 2;

/// Turns an error from a `try_*` operation into the failure of its
/// infallible counterpart.
#[cold]
#[track_caller]
fn raise(error: ArrayError) -> ! {
  if let ArrayError::AllocFailed { bytes, align } = error {
    if let Ok(layout) = Layout::from_size_align(bytes, align) {
      handle_alloc_error(layout);
    }
  }
  panic!("{error}")
}

/// A contiguous, growable array.
///
/// ```text
///   DynamicArray { block, len }
///
///   block.ptr
///      │
///      ▼
///   ┌──────┬──────┬──────┬──────┬ ─ ─ ─ ┬ ─ ─ ─ ┐
///   │  e0  │  e1  │  e2  │  e3  │       │       │
///   └──────┴──────┴──────┴──────┴ ─ ─ ─ ┴ ─ ─ ─ ┘
///   ◄──────── len (live) ───────►
///   ◄──────────────── capacity ────────────────►
/// ```
///
/// `len` is the only record of which slots hold a value: slots `[0, len)` are
/// live, slots `[len, capacity)` are raw memory. When an append finds no free
/// slot the capacity grows by half (at least by one) and every live element
/// is relocated into the new block before the old one is released.
///
/// Any capacity-changing or shifting operation needs `&mut self`, so
/// references and cursors into the array cannot outlive it.
pub struct DynamicArray<T> {
  block: RawBlock<T>,
  len: usize,
}

impl<T> DynamicArray<T> {
  /// An empty array with room for [`DEFAULT_CAPACITY`] elements.
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  pub fn try_new() -> Result<Self, ArrayError> {
    Self::try_with_capacity(DEFAULT_CAPACITY)
  }

  /// An empty array that owns no storage (capacity 0).
  ///
  /// This is the state a source is left in by [`take`](Self::take).
  pub const fn unallocated() -> Self {
    Self {
      block: RawBlock::dangling(),
      len: 0,
    }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self::try_with_capacity(capacity).unwrap_or_else(|e| raise(e))
  }

  pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
    Ok(Self {
      block: RawBlock::try_allocate(capacity)?,
      len: 0,
    })
  }

  /// Builds an array by appending `values` in order to a [`new`](Self::new)
  /// array, growing as needed.
  pub fn from_values<I>(values: I) -> Self
  where
    I: IntoIterator<Item = T>,
  {
    let mut array = Self::new();
    for value in values {
      array.push_back(value);
    }
    array
  }

  /// Moves the contents out, leaving `self` empty and unallocated.
  ///
  /// The storage itself changes hands; no element is moved or dropped.
  pub fn take(&mut self) -> Self {
    core_info!("array moved out ({} elements)", self.len);
    mem::replace(self, Self::unallocated())
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.block.capacity()
  }

  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.block.as_ptr(), self.len) }
  }

  pub fn as_mut_slice(&mut self) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(self.block.as_ptr(), self.len) }
  }

  pub fn as_ptr(&self) -> *const T {
    self.block.as_ptr()
  }

  /// Grows the capacity to exactly `capacity` if it is currently smaller.
  ///
  /// Note that unlike `Vec::reserve` the argument is the total capacity,
  /// not the number of additional elements.
  pub fn reserve(
    &mut self,
    capacity: usize,
  ) {
    self.try_reserve(capacity).unwrap_or_else(|e| raise(e))
  }

  pub fn try_reserve(
    &mut self,
    capacity: usize,
  ) -> Result<(), ArrayError> {
    if capacity > self.capacity() {
      self.reallocate(capacity)?;
    }
    Ok(())
  }

  /// Drops spare capacity. An empty array releases its storage entirely.
  pub fn shrink_to_fit(&mut self) {
    self.try_shrink_to_fit().unwrap_or_else(|e| raise(e))
  }

  pub fn try_shrink_to_fit(&mut self) -> Result<(), ArrayError> {
    if self.capacity() > self.len {
      self.reallocate(self.len)?;
    }
    Ok(())
  }

  /// Appends `value`.
  pub fn push_back(
    &mut self,
    value: T,
  ) {
    self.emplace_back(|| value);
  }

  pub fn try_push_back(
    &mut self,
    value: T,
  ) -> Result<(), ArrayError> {
    self.try_emplace_back(|| value).map(|_| ())
  }

  /// Appends the value returned by `make`, writing it straight into the new
  /// slot. `make` runs after any growth.
  pub fn emplace_back<F>(
    &mut self,
    make: F,
  ) -> &mut T
  where
    F: FnOnce() -> T,
  {
    match self.try_emplace_back(make) {
      Ok(value) => value,
      Err(e) => raise(e),
    }
  }

  pub fn try_emplace_back<F>(
    &mut self,
    make: F,
  ) -> Result<&mut T, ArrayError>
  where
    F: FnOnce() -> T,
  {
    self.ensure_spare_slot()?;

    unsafe {
      let slot = self.block.slot(self.len);
      slot.write(make());
      self.len += 1;
      Ok(&mut *slot)
    }
  }

  /// Inserts `value` at `index`, shifting `[index, len)` one slot right.
  ///
  /// # Panics
  ///
  /// If `index > len`.
  #[track_caller]
  pub fn insert_at(
    &mut self,
    index: usize,
    value: T,
  ) {
    self.emplace_at(index, || value);
  }

  pub fn try_insert_at(
    &mut self,
    index: usize,
    value: T,
  ) -> Result<(), ArrayError> {
    self.try_emplace_at(index, || value).map(|_| ())
  }

  /// Inserts the value returned by `make` at `index`.
  ///
  /// `make` runs before any element is shifted, so a panic inside it leaves
  /// the array untouched.
  ///
  /// # Panics
  ///
  /// If `index > len`.
  #[track_caller]
  pub fn emplace_at<F>(
    &mut self,
    index: usize,
    make: F,
  ) -> &mut T
  where
    F: FnOnce() -> T,
  {
    match self.try_emplace_at(index, make) {
      Ok(value) => value,
      Err(e) => raise(e),
    }
  }

  pub fn try_emplace_at<F>(
    &mut self,
    index: usize,
    make: F,
  ) -> Result<&mut T, ArrayError>
  where
    F: FnOnce() -> T,
  {
    if index > self.len {
      return Err(ArrayError::IndexOutOfBounds {
        index,
        len: self.len,
      });
    }

    if index == self.len {
      return self.try_emplace_back(make);
    }

    let value = make();
    self.ensure_spare_slot()?;

    unsafe {
      let slot = self.block.slot(index);
      ptr::copy(slot, slot.add(1), self.len - index);
      slot.write(value);
      self.len += 1;
      Ok(&mut *slot)
    }
  }

  /// Removes and returns the last element, or `None` if the array is empty.
  pub fn pop_back(&mut self) -> Option<T> {
    if self.len == 0 {
      return None;
    }

    self.len -= 1;
    Some(unsafe { self.block.slot(self.len).read() })
  }

  /// Removes the element at `index` and closes the gap, keeping the order
  /// of the rest.
  ///
  /// Returns `None` on an empty array. `index == len` removes the last
  /// element, like [`pop_back`](Self::pop_back).
  ///
  /// # Panics
  ///
  /// If the array is not empty and `index > len`.
  #[track_caller]
  pub fn remove_at(
    &mut self,
    index: usize,
  ) -> Option<T> {
    if self.len == 0 {
      return None;
    }

    if index == self.len {
      return self.pop_back();
    }

    if index > self.len {
      raise(ArrayError::IndexOutOfBounds {
        index,
        len: self.len,
      });
    }

    unsafe {
      let slot = self.block.slot(index);
      let value = slot.read();
      ptr::copy(slot.add(1), slot, self.len - index - 1);
      self.len -= 1;
      Some(value)
    }
  }

  /// Drops every element in index order. The capacity is kept.
  pub fn clear(&mut self) {
    let live = ptr::slice_from_raw_parts_mut(self.block.as_ptr(), self.len);
    // Forget the elements first: a panicking `Drop` must not lead to a
    // second drop from `DynamicArray::drop`.
    self.len = 0;
    unsafe { ptr::drop_in_place(live) };
  }

  /// Cursor at the first element.
  pub fn begin(&self) -> Cursor<'_, T> {
    Cursor::new(self.as_slice(), 0)
  }

  /// Cursor one past the last element.
  pub fn end(&self) -> Cursor<'_, T> {
    Cursor::new(self.as_slice(), self.len)
  }

  pub fn cbegin(&self) -> Cursor<'_, T> {
    self.begin()
  }

  pub fn cend(&self) -> Cursor<'_, T> {
    self.end()
  }

  pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
    CursorMut::new(self.as_mut_slice(), 0)
  }

  pub fn end_mut(&mut self) -> CursorMut<'_, T> {
    let len = self.len;
    CursorMut::new(self.as_mut_slice(), len)
  }

  /// Capacity after one growth step: half again as much, and always at
  /// least one more slot.
  fn grown_capacity(&self) -> Result<usize, ArrayError> {
    let capacity = self.capacity();
    let grown = capacity
      .checked_add(capacity / 2)
      .ok_or(ArrayError::CapacityOverflow)?;
    let next = capacity
      .checked_add(1)
      .ok_or(ArrayError::CapacityOverflow)?;

    Ok(grown.max(next))
  }

  fn ensure_spare_slot(&mut self) -> Result<(), ArrayError> {
    if self.len == self.capacity() {
      let capacity = self.grown_capacity()?;
      self.reallocate(capacity)?;
    }
    Ok(())
  }

  /// Moves the live elements into a fresh block of exactly `capacity` slots.
  ///
  /// The new block is allocated before anything moves, so on error the
  /// array is left as it was.
  fn reallocate(
    &mut self,
    capacity: usize,
  ) -> Result<(), ArrayError> {
    debug_assert!(capacity >= self.len);

    core_warn!("reallocating: capacity {} -> {}", self.capacity(), capacity);

    let mut fresh = RawBlock::try_allocate(capacity)?;
    unsafe { self.block.relocate_into(&mut fresh, self.len) };
    self.block = fresh;

    Ok(())
  }
}

impl<T: PartialEq> DynamicArray<T> {
  pub fn contains(
    &self,
    value: &T,
  ) -> bool {
    self.index_of(value).is_some()
  }

  /// Index of the first element equal to `value`.
  pub fn index_of(
    &self,
    value: &T,
  ) -> Option<usize> {
    self.as_slice().iter().position(|element| element == value)
  }
}

impl<T: Clone> DynamicArray<T> {
  /// Appends clones of every element of `values`.
  pub fn extend_from_slice(
    &mut self,
    values: &[T],
  ) {
    let needed = self
      .len
      .checked_add(values.len())
      .unwrap_or_else(|| raise(ArrayError::CapacityOverflow));
    self.reserve(needed);

    for value in values {
      self.push_back(value.clone());
    }
  }
}

impl<T> Drop for DynamicArray<T> {
  fn drop(&mut self) {
    core_trace!("array dropped ({} live elements)", self.len);
    unsafe { ptr::drop_in_place(self.as_mut_slice()) };
  }
}

/// Copies into a block sized to `len`; spare capacity is not carried over.
impl<T: Clone> Clone for DynamicArray<T> {
  fn clone(&self) -> Self {
    core_info!("array copied ({} elements)", self.len);

    let mut copy = Self::with_capacity(self.len);
    for value in self.as_slice() {
      copy.push_back(value.clone());
    }
    copy
  }
}

impl<T> Default for DynamicArray<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Deref for DynamicArray<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T> DerefMut for DynamicArray<T> {
  fn deref_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
  fn as_ref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
  fn as_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<T> Index<usize> for DynamicArray<T> {
  type Output = T;

  #[track_caller]
  fn index(
    &self,
    index: usize,
  ) -> &T {
    match self.as_slice().get(index) {
      Some(value) => value,
      None => raise(ArrayError::IndexOutOfBounds {
        index,
        len: self.len,
      }),
    }
  }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
  #[track_caller]
  fn index_mut(
    &mut self,
    index: usize,
  ) -> &mut T {
    let len = self.len;
    match self.as_mut_slice().get_mut(index) {
      Some(value) => value,
      None => raise(ArrayError::IndexOutOfBounds { index, len }),
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.as_slice()).finish()
  }
}

impl<T, U> PartialEq<DynamicArray<U>> for DynamicArray<T>
where
  T: PartialEq<U>,
{
  fn eq(
    &self,
    other: &DynamicArray<U>,
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T, U> PartialEq<[U]> for DynamicArray<T>
where
  T: PartialEq<U>,
{
  fn eq(
    &self,
    other: &[U],
  ) -> bool {
    self.as_slice() == other
  }
}

impl<T, U> PartialEq<&[U]> for DynamicArray<T>
where
  T: PartialEq<U>,
{
  fn eq(
    &self,
    other: &&[U],
  ) -> bool {
    self.as_slice() == *other
  }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T>
where
  T: PartialEq<U>,
{
  fn eq(
    &self,
    other: &[U; N],
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
  fn from(values: [T; N]) -> Self {
    Self::from_values(values)
  }
}

impl<T> FromIterator<T> for DynamicArray<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self::from_values(iter)
  }
}

impl<T> Extend<T> for DynamicArray<T> {
  fn extend<I: IntoIterator<Item = T>>(
    &mut self,
    iter: I,
  ) {
    for value in iter {
      self.push_back(value);
    }
  }
}

impl<T> IntoIterator for DynamicArray<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  fn into_iter(mut self) -> IntoIter<T> {
    let len = mem::replace(&mut self.len, 0);
    let block = mem::replace(&mut self.block, RawBlock::dangling());
    IntoIter::new(block, len)
  }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.as_slice().iter()
  }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
  type Item = &'a mut T;
  type IntoIter = slice::IterMut<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.as_mut_slice().iter_mut()
  }
}
