//! Manages entity ID allocation and deallocation.

use std::collections::VecDeque;
use std::iter;
use std::marker::PhantomData;

use super::{Primitive, Raw};

mod recycler;
pub use recycler::Recycler;

/// The default allocator, which reuses deallocated IDs before extending the ID space.
///
/// The default recycler is a FIFO queue,
/// so the ID that was deallocated earliest is reused first.
#[derive(Debug)]
pub struct Recycling<E: Raw, T: Recycler<E> = VecDeque<E>> {
    /// The smallest ID that has never been allocated.
    gauge:    Primitive,
    /// IDs that have been deallocated and are available for reuse.
    recycler: T,
    _ph:      PhantomData<E>,
}

impl<E: Raw, T: Recycler<E>> Default for Recycling<E, T> {
    fn default() -> Self { Self { gauge: 0, recycler: T::default(), _ph: PhantomData } }
}

impl<E: Raw, T: Recycler<E>> Recycling<E, T> {
    /// Creates an empty allocator.
    pub fn new() -> Self { Self::default() }

    /// Allocates an ID, reusing a deallocated ID if there is one.
    pub fn allocate(&mut self) -> E {
        if let Some(id) = self.recycler.poll() {
            id
        } else {
            let id = E::from_primitive(self.gauge);
            self.gauge += 1;
            id
        }
    }

    /// Returns an ID to the allocator.
    ///
    /// The caller must ensure that the ID is currently allocated;
    /// deallocating the same ID twice would cause it to be allocated twice.
    pub fn deallocate(&mut self, id: E) {
        debug_assert!(
            id.to_primitive() < self.gauge,
            "{id:?} was never allocated by this allocator"
        );
        self.recycler.extend(iter::once(id));
    }

    /// Returns the number of IDs ever allocated without reuse,
    /// i.e. one greater than the largest ID allocated so far.
    pub fn gauge(&self) -> Primitive { self.gauge }

    /// Returns the number of deallocated IDs available for reuse.
    pub fn recyclable(&self) -> usize { self.recycler.len() }

    /// Returns the number of IDs currently allocated.
    pub fn allocated(&self) -> usize { self.gauge - self.recycler.len() }
}
