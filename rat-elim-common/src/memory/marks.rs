//! `MarkSet` is a scratch set over a dense key space.
//!
//! Keys can only be marked through a [`MarkScope`](struct.MarkScope.html),
//! which unmarks everything it marked when it is dropped. Whoever borrows
//! the set next finds it empty, even if the previous user returned early.

use crate::memory::{Array, HeapSpace, Offset, Vector};
use rat_elim_macros::HeapSpace;
use std::fmt::Debug;

#[derive(Debug, Clone, HeapSpace)]
pub struct MarkSet<Key: Offset + Copy + Debug> {
    /// Membership bit per key.
    marked: Array<Key, bool>,
    /// The keys that are currently marked.
    trail: Vector<Key>,
}

impl<Key: Offset + Copy + Debug> MarkSet<Key> {
    /// Create a set that can hold keys with offsets below `size`.
    pub fn new(size: usize) -> MarkSet<Key> {
        MarkSet {
            marked: Array::new(false, size),
            trail: Vector::new(),
        }
    }
    pub fn size(&self) -> usize {
        self.marked.size()
    }
    /// Make room for keys with offsets below `size`.
    pub fn grow(&mut self, size: usize) {
        requires!(self.is_clear());
        if size > self.size() {
            self.marked = Array::new(false, size);
        }
    }
    pub fn is_clear(&self) -> bool {
        self.trail.is_empty()
    }
    /// Borrow the set for marking.
    pub fn scope(&mut self) -> MarkScope<Key> {
        invariant!(self.is_clear());
        MarkScope { set: self }
    }
}

impl<Key: Offset + Copy + Debug> Default for MarkSet<Key> {
    fn default() -> MarkSet<Key> {
        MarkSet::new(0)
    }
}

/// Exclusive access to a[`MarkSet`](struct.MarkSet.html) that clears it on drop.
pub struct MarkScope<'a, Key: Offset + Copy + Debug> {
    set: &'a mut MarkSet<Key>,
}

impl<'a, Key: Offset + Copy + Debug> MarkScope<'a, Key> {
    /// Mark a key, returning false if it was marked already.
    pub fn mark(&mut self, key: Key) -> bool {
        if self.set.marked[key] {
            return false;
        }
        self.set.marked[key] = true;
        self.set.trail.push(key);
        true
    }
    pub fn is_marked(&self, key: Key) -> bool {
        self.set.marked[key]
    }
    /// The number of marked keys.
    pub fn len(&self) -> usize {
        self.set.trail.len()
    }
    pub fn is_empty(&self) -> bool {
        self.set.trail.is_empty()
    }
}

impl<'a, Key: Offset + Copy + Debug> Drop for MarkScope<'a, Key> {
    fn drop(&mut self) {
        while let Some(key) = self.set.trail.pop() {
            self.set.marked[key] = false;
        }
    }
}
