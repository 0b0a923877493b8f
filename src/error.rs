//! Error type for fallible [`DynamicArray`](crate::DynamicArray) operations.

use std::error::Error;
use std::fmt;

/// Errors reported by the `try_*` family of operations.
///
/// The infallible counterparts turn these into a panic (index and overflow
/// errors) or into [`std::alloc::handle_alloc_error`] (allocator failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArrayError {
  /// The requested capacity does not fit in `isize::MAX` bytes.
  CapacityOverflow,
  /// The global allocator refused the request.
  AllocFailed {
    /// Size of the rejected block in bytes.
    bytes: usize,
    /// Alignment of the rejected block.
    align: usize,
  },
  /// An insertion or removal position outside `0..=len`.
  IndexOutOfBounds {
    /// The offending position.
    index: usize,
    /// Length of the array at the time of the call.
    len: usize,
  },
}

impl fmt::Display for ArrayError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      Self::CapacityOverflow => f.write_str("capacity overflow"),
      Self::AllocFailed { bytes, align } => {
        write!(f, "allocation of {bytes} bytes (align {align}) failed")
      }
      Self::IndexOutOfBounds { index, len } => {
        write!(f, "index out of bounds: the len is {len} but the index is {index}")
      }
    }
  }
}

impl Error for ArrayError {}
