//! General purpose data structures
//!
//! These are `std::vec::Vec` wrappers tuned for a specific purpose,
//! so they are harder to misuse.
//!
//! - The first template argument in `Array<I, T>` specifies the type used
//!   for indexing. This prevents us from indexing the side tables of the
//!   proof arena with a literal, or the other way around.
//!
//! - `MarkSet<K>` is a scratch set that is emptied when the scope that
//!   filled it ends.
//!
//! - Bounds checking can be disabled for all these vectors.

mod array;
mod marks;
#[macro_use]
mod vector;

pub use crate::memory::{
    array::Array,
    marks::{MarkScope, MarkSet},
    vector::{assert_in_bounds, Vector},
};

/// Trait for types that can be used as an array index.
pub trait Offset {
    fn as_offset(&self) -> usize;
}

impl Offset for usize {
    fn as_offset(&self) -> usize {
        *self
    }
}

/// A trait for objects that can report their memory usage on the heap
pub trait HeapSpace {
    /// The number of bytes allocated on the heap that this owns.
    fn heap_space(&self) -> usize;
}

impl<T: Copy> HeapSpace for T {
    fn heap_space(&self) -> usize {
        0
    }
}

/// Convert bytes to megabytes for readability.
pub fn format_memory_usage(bytes: usize) -> String {
    format!("{:12}", bytes >> 20) // MB
}
