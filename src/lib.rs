//! # rarray - A Growable Contiguous Array
//!
//! This crate provides [`DynamicArray`], a generic dynamic array that owns a
//! single block of raw memory from the libc heap, constructs elements in
//! place, and tracks which slots are live with nothing but its length.
//!
//! ## Overview
//!
//! ```text
//!   DynamicArray<T>:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                     BLOCK (posix_memalign)                           │
//!   │                                                                      │
//!   │   ┌─────┬─────┬─────┬─────┬───────────────────────────────────────┐  │
//!   │   │ e0  │ e1  │ e2  │ e3  │         Uninitialized slots           │  │
//!   │   └─────┴─────┴─────┴─────┴───────────────────────────────────────┘  │
//!   │                           ▲                                     ▲    │
//!   │                           │                                     │    │
//!   │                          len                                capacity │
//!   │                     (next append)                                    │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Appending writes into slot `len` and bumps it.
//!   Fast append: O(1) amortized.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarray
//!   ├── align      - Alignment macros (align_to!, word_align!)
//!   ├── raw        - RawBlock: uninitialized storage (internal)
//!   ├── array      - DynamicArray implementation
//!   ├── cursor     - Cursor / CursorMut position cursors
//!   ├── iter       - Owning iterator
//!   ├── error      - ArrayError
//!   └── log        - Leveled core/client logging
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rarray::DynamicArray;
//!
//! let mut points = DynamicArray::from([(5, 5), (6, 6)]);
//!
//! points.emplace_at(1, || (10, 10));
//! points.insert_at(1, (15, 15));
//!
//! let mut it = points.cbegin();
//! while it != points.cend() {
//!     println!("{:?}", *it);
//!     it.inc();
//! }
//!
//! assert_eq!(points, [(5, 5), (15, 15), (10, 10), (6, 6)]);
//! ```
//!
//! ## How It Grows
//!
//! When an append finds `len == capacity`, a new block is allocated with
//! half as many slots again (and never fewer than one more), the live
//! elements are relocated, and the old block is released:
//!
//! ```text
//!   Before (len = capacity = 4):
//!   ┌─────┬─────┬─────┬─────┐
//!   │ e0  │ e1  │ e2  │ e3  │
//!   └─────┴─────┴─────┴─────┘
//!
//!   After push_back(e4) (capacity = 6):
//!   ┌─────┬─────┬─────┬─────┬─────┬─────┐
//!   │ e0  │ e1  │ e2  │ e3  │ e4  │     │
//!   └─────┴─────┴─────┴─────┴─────┴─────┘
//!
//!   Capacities from new(): 2 → 3 → 4 → 6 → 9 → 13 → 19 → ...
//! ```
//!
//! The new block is allocated before anything moves. If that fails the
//! array is left exactly as it was and the `try_*` form reports
//! [`ArrayError::AllocFailed`].
//!
//! ## Insertion and Removal
//!
//! ```text
//!   insert_at(1, x):               remove_at(1):
//!
//!   ┌────┬────┬────┬ ─ ─┐          ┌────┬────┬────┬────┐
//!   │ a  │ b  │ c  │    │          │ a  │ x  │ b  │ c  │
//!   └────┴────┴────┴ ─ ─┘          └────┴────┴────┴────┘
//!          └──►└──►                       ◄──┘◄──┘
//!   ┌────┬────┬────┬────┐          ┌────┬────┬────┬ ─ ─┐
//!   │ a  │ x  │ b  │ c  │          │ a  │ b  │ c  │    │
//!   └────┴────┴────┴────┘          └────┴────┴────┴ ─ ─┘
//! ```
//!
//! ## Ownership
//!
//! - [`Clone`] copies into a block of exactly `len` slots.
//! - [`DynamicArray::take`] hands the block to a new array and leaves the
//!   source empty with no storage; it stays fully usable.
//! - Dropping the array drops `[0, len)` in index order and then frees the
//!   block. Elements already removed by `pop_back`, `remove_at` or `clear`
//!   are never dropped again.
//!
//! ## Logging
//!
//! The container reports reallocations, copies and moves through the
//! `core_*` macros of [`log`]. Nothing is emitted until a sink is installed
//! with [`log::init`], and release builds compile the calls away.
//!
//! ## Limitations
//!
//! - **No internal synchronization**: `Send`/`Sync` follow `T`, like `Vec`
//! - **One allocation strategy**: Always the libc heap
//! - **Unix-only**: Requires `libc` and `posix_memalign` (POSIX systems)

pub mod align;
mod array;
mod cursor;
mod error;
mod iter;
pub mod log;
mod raw;

pub use array::{DEFAULT_CAPACITY, DynamicArray};
pub use cursor::{Cursor, CursorMut, CursorRange};
pub use error::ArrayError;
pub use iter::IntoIter;
