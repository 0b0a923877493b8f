/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two, and `value + align - 1` must not
/// overflow.
///
/// # Examples
///
/// ```rust
/// use rarray::align_to;
///
/// assert_eq!(align_to!(13, 8), 16);
/// assert_eq!(align_to!(16, 8), 16);
/// assert_eq!(align_to!(1, 32), 32);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Rounds `value` up to the machine word size.
///
/// # Examples
///
/// ```rust
/// use rarray::word_align;
///
/// match std::mem::size_of::<usize>() {
///     8 => assert_eq!(word_align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(word_align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! word_align {
  ($value:expr) => {
    $crate::align_to!($value, ::core::mem::size_of::<usize>())
  };
}
