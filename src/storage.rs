//! A storage is the data structure where components of the same type for all entities are stored.
//!
//! Each component type is stored in a [`SparseSet`],
//! which keeps the components densely packed for iteration
//! while supporting constant-time lookup by entity ID.
//! A [`World`](crate::World) keeps all its sparse sets in one heterogeneous map
//! by erasing their component types behind a [`Host`].

mod sparse;
pub use sparse::SparseSet;

mod host;
pub use host::Host;
