//! `Vector` is a thin wrapper around
//! [std::vec::Vec](https://doc.rust-lang.org/std/vec/struct.Vec.html)

use crate::{config, memory::HeapSpace};
use static_assertions::const_assert;
use std::{
    iter::FromIterator,
    mem::size_of,
    ops::{Deref, DerefMut, Index, IndexMut, Range, RangeFrom, RangeFull, RangeTo},
    slice,
};

/// A contiguous growable array type like [`std::vec::Vec`](https://doc.rust-lang.org/std/vec/struct.Vec.html)
///
/// The difference to `std::vec::Vec` is that `Vector` uses a different
/// growth factor (1.5 instead of 2) and can disable bounds checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vector<T>(Vec<T>);

impl<T> Default for Vector<T> {
    fn default() -> Vector<T> {
        Vector::new()
    }
}

impl<T> Vector<T> {
    /// Wrap a `std::vec::Vec`.
    pub fn from_vec(vec: Vec<T>) -> Vector<T> {
        Vector(vec)
    }
    pub fn new() -> Vector<T> {
        Vector(Vec::new())
    }
    pub fn with_capacity(capacity: usize) -> Vector<T> {
        Vector(Vec::with_capacity(capacity))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
    pub fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }
    pub fn iter(&self) -> slice::Iter<T> {
        self.0.iter()
    }
    pub fn truncate(&mut self, new_length: usize) {
        self.0.truncate(new_length)
    }
    pub fn clear(&mut self) {
        self.0.clear()
    }
    pub fn push(&mut self, value: T) {
        if self.len() == self.capacity() {
            let new_capacity = next_capacity(self);
            self.0.reserve_exact(new_capacity - self.capacity())
        }
        self.0.push(value)
    }
}

/// Returns the capacity to use when growing the vector.
///
/// This uses a growth factor of 1.5 instead of the default 2.
/// Related: https://github.com/rust-lang/rust/issues/29931
fn next_capacity<T>(vector: &Vector<T>) -> usize {
    if vector.capacity() == 0 {
        4
    } else {
        // Assuming we are running on a 64 bit system, this will not overflow
        // for our expected input sizes.
        const_assert!(size_of::<usize>() >= 8);
        vector.capacity() * 3 / 2
    }
}

/// Similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html) ---
/// construct a new vector with the given elements.
#[allow(unused_macros)]
macro_rules! vector {
    ($($x:expr),*) => (
        {
            #[allow(unused_mut)]
            let mut result = $crate::memory::Vector::new();
            $(
                result.push($x);
            )*
            result
        }
    );
    ($($x:expr,)*) => (vector!($($x),*))
}

impl<T: Clone> Vector<T> {
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.0.extend_from_slice(other)
    }
}

impl<T: Ord> Vector<T> {
    pub fn sort_unstable(&mut self) {
        self.0.sort_unstable()
    }
}

impl<T: PartialEq> Vector<T> {
    pub fn dedup(&mut self) {
        self.0.dedup()
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

/// Check if an offset is contained in a half-open range.
/// # Panics
/// Panic if bounds checking is enabled and the index is out of the given bounds.
pub fn assert_in_bounds(bounds: Range<usize>, offset: usize) {
    if config::ENABLE_BOUNDS_CHECKING {
        assert!(
            bounds.contains(&offset),
            "array index out of bounds: {} (range is {:?})",
            offset,
            bounds,
        );
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        assert_in_bounds(0..self.len(), index);
        unsafe { self.0.get_unchecked(index) }
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert_in_bounds(0..self.len(), index);
        unsafe { self.0.get_unchecked_mut(index) }
    }
}

impl<T> Index<Range<usize>> for Vector<T> {
    type Output = [T];
    #[allow(clippy::range_plus_one)]
    fn index(&self, index: Range<usize>) -> &Self::Output {
        assert_in_bounds(0..self.len() + 1, index.start);
        assert_in_bounds(0..self.len() + 1, index.end);
        assert!(index.start <= index.end, "slice index starts after its end");
        unsafe { slice::from_raw_parts(self.0.as_ptr().add(index.start), index.end - index.start) }
    }
}

impl<T> IndexMut<Range<usize>> for Vector<T> {
    #[allow(clippy::range_plus_one)]
    fn index_mut(&mut self, index: Range<usize>) -> &mut Self::Output {
        assert_in_bounds(0..self.len() + 1, index.start);
        assert_in_bounds(0..self.len() + 1, index.end);
        assert!(index.start <= index.end, "slice index starts after its end");
        unsafe {
            slice::from_raw_parts_mut(
                self.0.as_mut_ptr().add(index.start),
                index.end - index.start,
            )
        }
    }
}

impl<T> Index<RangeFrom<usize>> for Vector<T> {
    type Output = [T];
    fn index(&self, index: RangeFrom<usize>) -> &Self::Output {
        &self[index.start..self.len()]
    }
}

impl<T> IndexMut<RangeFrom<usize>> for Vector<T> {
    fn index_mut(&mut self, index: RangeFrom<usize>) -> &mut Self::Output {
        let end = self.len();
        &mut self[index.start..end]
    }
}

impl<T> Index<RangeTo<usize>> for Vector<T> {
    type Output = [T];
    fn index(&self, index: RangeTo<usize>) -> &Self::Output {
        &self[0..index.end]
    }
}

impl<T> IndexMut<RangeTo<usize>> for Vector<T> {
    fn index_mut(&mut self, index: RangeTo<usize>) -> &mut Self::Output {
        &mut self[0..index.end]
    }
}

impl<T> Index<RangeFull> for Vector<T> {
    type Output = [T];
    fn index(&self, _index: RangeFull) -> &Self::Output {
        &self.0
    }
}

impl<T> IndexMut<RangeFull> for Vector<T> {
    fn index_mut(&mut self, _index: RangeFull) -> &mut Self::Output {
        &mut self.0
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = <Vec<T> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Vector<T> {
        Vector(Vec::from_iter(iter))
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value)
        }
    }
}

impl<T: HeapSpace> HeapSpace for Vector<T> {
    fn heap_space(&self) -> usize {
        self.capacity() * size_of::<T>() + self.iter().map(HeapSpace::heap_space).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_half() {
        let mut vector = Vector::new();
        for i in 0..5 {
            vector.push(i);
        }
        assert!(vector.capacity() >= 5 && vector.capacity() < 8);
        assert_eq!(&vector[..], &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn sort_and_dedup() {
        let mut vector: Vector<u32> = vector![3, 1, 3, 2, 1];
        vector.sort_unstable();
        vector.dedup();
        assert_eq!(vector, vector![1, 2, 3]);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Handle(u32);

    #[test]
    fn elements_without_default() {
        let mut vector: Vector<Handle> = Vector::default();
        assert!(vector.is_empty());
        vector.push(Handle(7));
        vector.push(Handle(8));
        vector.push(Handle(9));
        assert_eq!(&vector[..], &[Handle(7), Handle(8), Handle(9)]);
        assert_eq!(&vector[1..], &[Handle(8), Handle(9)]);
        assert_eq!(&vector[..1], &[Handle(7)]);
        assert_eq!(&vector[1..2], &[Handle(8)]);
        assert!(vector[3..].is_empty());
        vector[..2].reverse();
        assert_eq!(&vector[..], &[Handle(8), Handle(7), Handle(9)]);
    }
}
