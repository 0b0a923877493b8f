use std::{fmt, iter::FusedIterator, ptr, slice};

use crate::raw::RawBlock;

/// Owning iterator returned by `DynamicArray::into_iter`.
///
/// Slots `[front, back)` are still live; everything else has been handed
/// out. Dropping the iterator drops what is left, then frees the block.
pub struct IntoIter<T> {
  block: RawBlock<T>,
  front: usize,
  back: usize,
}

impl<T> IntoIter<T> {
  pub(crate) fn new(
    block: RawBlock<T>,
    len: usize,
  ) -> Self {
    Self {
      block,
      front: 0,
      back: len,
    }
  }

  /// The elements not yet yielded.
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.block.slot(self.front), self.back - self.front) }
  }
}

impl<T> Iterator for IntoIter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    if self.front == self.back {
      return None;
    }

    let value = unsafe { self.block.slot(self.front).read() };
    self.front += 1;
    Some(value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.back - self.front;
    (remaining, Some(remaining))
  }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
  fn next_back(&mut self) -> Option<T> {
    if self.front == self.back {
      return None;
    }

    self.back -= 1;
    Some(unsafe { self.block.slot(self.back).read() })
  }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
  }
}

impl<T> Drop for IntoIter<T> {
  fn drop(&mut self) {
    let remaining = ptr::slice_from_raw_parts_mut(
      unsafe { self.block.slot(self.front) },
      self.back - self.front,
    );
    self.front = self.back;
    unsafe { ptr::drop_in_place(remaining) };
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use crate::DynamicArray;

  #[test]
  fn test_yields_in_order() {
    let array = DynamicArray::from([1, 2, 3, 4]);
    let mut it = array.into_iter();

    assert_eq!(it.len(), 4);
    assert_eq!(it.next(), Some(1));
    assert_eq!(it.next_back(), Some(4));
    assert_eq!(it.as_slice(), &[2, 3]);
    assert_eq!(it.collect::<Vec<_>>(), [2, 3]);
  }

  #[test]
  fn test_drops_unconsumed() {
    let tracker = Rc::new(());
    let array = DynamicArray::from_values((0..5).map(|_| Rc::clone(&tracker)));
    assert_eq!(Rc::strong_count(&tracker), 6);

    let mut it = array.into_iter();
    let first = it.next();
    drop(it);

    assert_eq!(Rc::strong_count(&tracker), 2);
    drop(first);
    assert_eq!(Rc::strong_count(&tracker), 1);
  }

  #[test]
  fn test_empty() {
    let array: DynamicArray<String> = DynamicArray::new();
    let mut it = array.into_iter();

    assert_eq!(it.next(), None);
    assert_eq!(it.next_back(), None);
  }
}
