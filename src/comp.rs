//! A component is a plain data record attached to an entity.
//!
//! Each component type is stored in its own [pool](crate::storage::SparseSet)
//! in every [`World`](crate::World) that has used it.
//! Pools are looked up through the [`Key`] of the component type.

use std::any::{self, TypeId};
use std::{cmp, fmt, hash};

/// A type that can be attached to entities.
///
/// Usually implemented through the [`#[comp]`](macro@crate::comp) attribute.
pub trait Component: Send + Sync + Sized + 'static {}

/// Identifies a component type.
///
/// Keys compare and hash by [`TypeId`] only;
/// the type name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct Key {
    id:   TypeId,
    name: &'static str,
}

impl Key {
    /// Returns the key of `T`.
    pub fn of<T: 'static>() -> Self { Self { id: TypeId::of::<T>(), name: any::type_name::<T>() } }

    /// Returns the type name of the component type.
    pub fn name(&self) -> &'static str { self.name }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> { Some(self.cmp(other)) }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> cmp::Ordering { self.id.cmp(&other.id) }
}

impl hash::Hash for Key {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name) }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name) }
}
