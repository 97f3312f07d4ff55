//! Tracks the number of times a storage slot has been occupied,
//! used for distinguishment of stale handles.

/// The number of times the same slot has been used for storing a component.
/// A greater generation implies a newer occupant, until the counter wraps around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// Returns the generation of the next occupant of the slot.
    #[must_use]
    pub fn next(self) -> Self { Self(self.0.wrapping_add(1)) }

    /// Returns the raw counter.
    pub fn get(self) -> u32 { self.0 }
}
