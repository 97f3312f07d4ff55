use std::collections::{BTreeSet, VecDeque};

use crate::entity::Raw;

/// A data structure that provides the ability to recycle entity IDs.
pub trait Recycler<E: Raw>: Default + Extend<E> + Send + Sync + 'static {
    /// Returns the length of this recycler.
    fn len(&self) -> usize;

    /// Returns whether the recycler is empty.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Removes the next ID to reuse from the recycler.
    fn poll(&mut self) -> Option<E>;
}

/// A minimal recycler implemented through a FILO stack.
impl<E: Raw> Recycler<E> for Vec<E> {
    fn len(&self) -> usize { Vec::len(self) }

    fn poll(&mut self) -> Option<E> { self.pop() }
}

/// A FIFO recycler, which delays the reuse of each ID as long as possible.
impl<E: Raw> Recycler<E> for VecDeque<E> {
    fn len(&self) -> usize { VecDeque::len(self) }

    fn poll(&mut self) -> Option<E> { self.pop_front() }
}

/// A recycler that reuses the smallest ID first,
/// which keeps Vec-based storages dense.
impl<E: Raw> Recycler<E> for BTreeSet<E> {
    fn len(&self) -> usize { BTreeSet::len(self) }

    fn poll(&mut self) -> Option<E> { self.pop_first() }
}
