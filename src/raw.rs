use std::{
  marker::PhantomData,
  mem,
  ptr::{self, NonNull},
};

use libc::{c_void, free, posix_memalign};

use crate::{align_to, core_trace, error::ArrayError, word_align};

/// An owned block of `capacity` uninitialized slots of `T`.
///
/// The block only manages memory: it never constructs or drops a `T`.
/// Which slots are live is tracked by the owner.
///
/// ```text
///   ptr
///    │
///    ▼
///   ┌──────┬──────┬──────┬──────┬──────┬──────┐
///   │ slot │ slot │ slot │ slot │ slot │ pad  │   bytes = align_to!(cap * size, ALIGN)
///   └──────┴──────┴──────┴──────┴──────┴──────┘
///   ◄──────────── capacity slots ─────────────►
/// ```
///
/// Blocks that would be zero bytes long (capacity 0, or a zero-sized `T`)
/// never reach the allocator and hold a dangling pointer.
pub(crate) struct RawBlock<T> {
  ptr: NonNull<T>,
  capacity: usize,
  _owns: PhantomData<T>,
}

// SAFETY: the block uniquely owns its slots, so sending it sends the `T`s.
unsafe impl<T: Send> Send for RawBlock<T> {}
// SAFETY: `&RawBlock` only hands out shared access to the slots.
unsafe impl<T: Sync> Sync for RawBlock<T> {}

impl<T> RawBlock<T> {
  /// Alignment handed to `posix_memalign`, which requires a power of two
  /// that is also a multiple of the word size.
  const ALIGN: usize = word_align!(mem::align_of::<T>());

  pub(crate) const fn dangling() -> Self {
    Self {
      ptr: NonNull::dangling(),
      capacity: 0,
      _owns: PhantomData,
    }
  }

  /// Number of bytes a block of `capacity` slots occupies.
  pub(crate) fn byte_size(capacity: usize) -> Result<usize, ArrayError> {
    let bytes = mem::size_of::<T>()
      .checked_mul(capacity)
      .ok_or(ArrayError::CapacityOverflow)?;

    if bytes > isize::MAX as usize - Self::ALIGN {
      return Err(ArrayError::CapacityOverflow);
    }

    Ok(align_to!(bytes, Self::ALIGN))
  }

  pub(crate) fn try_allocate(capacity: usize) -> Result<Self, ArrayError> {
    let bytes = Self::byte_size(capacity)?;

    if bytes == 0 {
      return Ok(Self {
        capacity,
        ..Self::dangling()
      });
    }

    let mut address: *mut c_void = ptr::null_mut();
    let status = unsafe { posix_memalign(&mut address, Self::ALIGN, bytes) };

    let ptr = match NonNull::new(address as *mut T) {
      Some(ptr) if status == 0 => ptr,
      _ => {
        return Err(ArrayError::AllocFailed {
          bytes,
          align: Self::ALIGN,
        });
      }
    };

    core_trace!("allocated {bytes} bytes for {capacity} slots, address = {ptr:?}");

    Ok(Self {
      ptr,
      capacity,
      _owns: PhantomData,
    })
  }

  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub(crate) fn as_ptr(&self) -> *mut T {
    self.ptr.as_ptr()
  }

  /// Address of slot `index`.
  ///
  /// # Safety
  ///
  /// `index` must be at most `capacity`.
  #[inline]
  pub(crate) unsafe fn slot(
    &self,
    index: usize,
  ) -> *mut T {
    debug_assert!(index <= self.capacity);
    unsafe { self.ptr.as_ptr().add(index) }
  }

  /// Moves the first `count` slots into the front of `dst`.
  ///
  /// Afterwards those slots of `self` are logically uninitialized.
  ///
  /// # Safety
  ///
  /// The first `count` slots of `self` must be live, and `dst` must have
  /// room for `count` slots that hold no live value.
  pub(crate) unsafe fn relocate_into(
    &self,
    dst: &mut RawBlock<T>,
    count: usize,
  ) {
    debug_assert!(count <= self.capacity && count <= dst.capacity);
    unsafe { ptr::copy_nonoverlapping(self.as_ptr(), dst.as_ptr(), count) };
  }
}

impl<T> Drop for RawBlock<T> {
  fn drop(&mut self) {
    if mem::size_of::<T>() != 0 && self.capacity != 0 {
      core_trace!("released {} slots, address = {:?}", self.capacity, self.ptr);
      unsafe { free(self.ptr.as_ptr() as *mut c_void) };
    }
  }
}
