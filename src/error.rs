use std::error::Error as StdError;

use crate::entity::Global;
use crate::registry::WorldIndex;
use crate::world::WorldId;

/// Errors returned by fallible operations on worlds, registries and handles.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The component referenced by a handle has been destroyed or replaced.
    #[error("handle refers to a component that no longer exists")]
    InvalidHandle,
    /// A handle was used with a world other than the one it was created from.
    #[error("handle belongs to {expected} but was used with {actual}")]
    ForeignWorld {
        /// The world the handle was created from.
        expected: WorldId,
        /// The world the handle was used with.
        actual:   WorldId,
    },
    /// The entity ID does not refer to a live entity.
    #[error("{0} is not a live entity")]
    DeadEntity(Global),
    /// The world index is not registered in the registry.
    #[error("{0} is not registered")]
    UnknownWorld(WorldIndex),
    /// The entity has been staged but not placed into any world yet.
    #[error("{0} is not placed in any world")]
    NotBound(Global),
    /// The entity is already placed in a world.
    #[error("{0} is already placed in {1}")]
    AlreadyBound(Global, WorldIndex),
    /// An error returned by a prototype assembly hook.
    #[error("failed to assemble prototype")]
    Assembly(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary error raised during prototype assembly.
    pub fn assembly(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Assembly(err.into())
    }
}

/// The result type of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
