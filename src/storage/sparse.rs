use std::fmt;

use crate::entity::{Generation, Local, Raw};

/// The dense index stored in a slot whose owner has no component.
const ABSENT: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Index into `dense` and `aux`, or [`ABSENT`].
    dense:      u32,
    /// Incremented every time a component is emplaced into this slot.
    generation: Generation,
}

impl Default for Slot {
    fn default() -> Self { Self { dense: ABSENT, generation: Generation::default() } }
}

impl Slot {
    fn index(self) -> Option<usize> {
        (self.dense != ABSENT).then(|| self.dense.try_into().expect("usize >= u32"))
    }
}

/// A pool of components of type `T`, indexed by local entity ID.
///
/// Components are stored contiguously in a dense array,
/// with the owner of each component stored at the same index in a parallel array.
/// A sparse array indexed by entity ID redirects to the dense index.
///
/// Removal swaps the last component into the vacated position,
/// so the iteration order is not stable across removals.
pub struct SparseSet<T> {
    dense:  Vec<T>,
    aux:    Vec<Local>,
    sparse: Vec<Slot>,
}

static_assertions::assert_eq_size!(SparseSet<u8>, SparseSet<[u64; 16]>);

impl<T> Default for SparseSet<T> {
    fn default() -> Self { Self { dense: Vec::new(), aux: Vec::new(), sparse: Vec::new() } }
}

impl<T> SparseSet<T> {
    /// Creates an empty sparse set.
    pub fn new() -> Self { Self::default() }

    /// Creates an empty sparse set with space for `capacity` components
    /// without reallocating the dense array.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense:  Vec::with_capacity(capacity),
            aux:    Vec::with_capacity(capacity),
            sparse: Vec::new(),
        }
    }

    /// Returns the number of components in this set.
    pub fn len(&self) -> usize { self.dense.len() }

    /// Returns whether this set contains no components.
    pub fn is_empty(&self) -> bool { self.dense.is_empty() }

    fn slot(&self, owner: Local) -> Option<Slot> { self.sparse.get(owner.to_primitive()).copied() }

    fn slot_mut(&mut self, owner: Local) -> &mut Slot {
        let index = owner.to_primitive();
        if self.sparse.len() <= index {
            self.sparse.resize(index + 1, Slot::default());
        }
        self.sparse.get_mut(index).expect("just resized")
    }

    /// Returns the dense index of the component owned by `owner`, if any.
    pub fn dense_index(&self, owner: Local) -> Option<usize> { self.slot(owner)?.index() }

    /// Checks whether `owner` has a component in this set.
    ///
    /// IDs beyond the sparse array are simply absent.
    pub fn has(&self, owner: Local) -> bool { self.dense_index(owner).is_some() }

    /// Returns the generation of the component owned by `owner`,
    /// or `None` if `owner` has no component.
    pub fn generation(&self, owner: Local) -> Option<Generation> {
        let slot = self.slot(owner)?;
        slot.index().map(|_| slot.generation)
    }

    /// Adds a component for `owner`, returning its dense index.
    ///
    /// If `owner` already has a component, it is replaced in place.
    /// Either way, the generation of the slot is advanced,
    /// so handles to the previous occupant become invalid.
    pub fn emplace(&mut self, owner: Local, value: T) -> usize {
        let slot = self.slot_mut(owner);
        slot.generation = slot.generation.next();

        if let Some(index) = slot.index() {
            *self.dense.get_mut(index).expect("sparse slot points beyond dense array") = value;
            index
        } else {
            let index = self.dense.len();
            self.slot_mut(owner).dense = index.try_into().expect("too many components in one pool");
            self.dense.push(value);
            self.aux.push(owner);
            index
        }
    }

    /// Removes the component owned by `owner`.
    ///
    /// # Panics
    /// Panics if `owner` does not have a component
    /// and preconditions are checked in this build.
    /// Otherwise, returns `None` in that case.
    pub fn destroy(&mut self, owner: Local) -> Option<T> {
        precondition!(self.has(owner), "{owner} does not have a component in this pool");
        self.destroy_if_present(owner)
    }

    /// Removes the component owned by `owner` if there is one.
    pub fn destroy_if_present(&mut self, owner: Local) -> Option<T> {
        let index = self.dense_index(owner)?;

        let value = self.dense.swap_remove(index);
        let removed = self.aux.swap_remove(index);
        debug_assert_eq!(removed, owner, "aux array out of sync with sparse array");

        if let Some(&moved) = self.aux.get(index) {
            // the last component was moved into the vacated index
            self.slot_mut(moved).dense = index.try_into().expect("index was read from a slot");
        }
        self.slot_mut(owner).dense = ABSENT;

        Some(value)
    }

    /// Removes all components, retaining the slot generations.
    pub fn clear(&mut self) {
        for &owner in &self.aux {
            self.sparse[owner.to_primitive()].dense = ABSENT;
        }
        self.dense.clear();
        self.aux.clear();
    }

    /// Gets the component owned by `owner`.
    pub fn get(&self, owner: Local) -> Option<&T> {
        let index = self.dense_index(owner)?;
        Some(self.get_by_dense(index))
    }

    /// Gets the component owned by `owner` mutably.
    pub fn get_mut(&mut self, owner: Local) -> Option<&mut T> {
        let index = self.dense_index(owner)?;
        Some(self.get_by_dense_mut(index))
    }

    /// Gets the component at a dense index.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn get_by_dense(&self, index: usize) -> &T {
        self.dense.get(index).expect("dense index out of bounds")
    }

    /// Gets the component at a dense index mutably.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn get_by_dense_mut(&mut self, index: usize) -> &mut T {
        self.dense.get_mut(index).expect("dense index out of bounds")
    }

    /// Returns the owner of the component at a dense index.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn owner_of(&self, index: usize) -> Local {
        *self.aux.get(index).expect("dense index out of bounds")
    }

    /// Returns the owners of all components in dense order.
    pub fn owners(&self) -> &[Local] { &self.aux }

    /// Returns all components in dense order.
    pub fn values(&self) -> &[T] { &self.dense }

    /// Returns all components in dense order mutably.
    pub fn values_mut(&mut self) -> &mut [T] { &mut self.dense }

    /// Iterates over `(owner, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Local, &T)> + '_ {
        self.aux.iter().copied().zip(self.dense.iter())
    }

    /// Iterates over `(owner, component)` pairs in dense order mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Local, &mut T)> + '_ {
        self.aux.iter().copied().zip(self.dense.iter_mut())
    }

    /// Asserts that the dense, aux and sparse arrays agree with each other.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.dense.len(), self.aux.len());

        for (index, &owner) in self.aux.iter().enumerate() {
            assert_eq!(self.dense_index(owner), Some(index), "{owner} is not redirected to {index}");
        }

        let occupied = self.sparse.iter().filter(|slot| slot.index().is_some()).count();
        assert_eq!(occupied, self.aux.len(), "sparse array has dangling slots");
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
