//! A sparse-set entity/component storage and query engine.
//!
//! # Entities and worlds
//! An entity is a plain identifier without any data.
//! Each [`World`] owns a namespace of [local entity IDs](entity::Local)
//! and one pool per component type that has ever been attached to its entities.
//! Pools are created lazily the first time a component of a type is emplaced,
//! so component types never need to be declared in advance.
//!
//! A [`Registry`] owns several worlds and a global entity namespace.
//! Each [global entity ID](entity::Global) is bound to exactly one `(world, local ID)` pair,
//! which allows entities to be [relocated](Registry::relocate) between worlds
//! without changing their global identity.
//!
//! # Storage
//! Components of the same type in the same world are stored in a [`SparseSet`](storage::SparseSet),
//! which keeps all live components in a single contiguous array
//! and supports constant-time insertion, lookup and removal.
//! Removal swaps the last component into the vacated slot,
//! so the order of components in a pool is not stable.
//!
//! All pools of a world are stored in a single map regardless of their component type.
//! Each pool lives inline in a fixed-size type-erased [`Host`](storage::Host)
//! together with the few operations that must be performed without knowing the component type,
//! such as removing all components of a destroyed entity.
//!
//! # Queries
//! [`World::filter`] visits every entity that has all of the requested component types.
//! The first listed component type drives the iteration,
//! so listing the rarest component type first is usually fastest.
//!
//! # Handles
//! A [`Handle`] is a revalidatable reference to a single component.
//! Handles record the generation of the slot they point to,
//! so a handle never aliases a different component that later reuses the same slot.
//!
//! # Prototypes
//! A [`Prototype`] describes a kind of entity together with the components it is assembled with.
//! Prototypes are usually declared with the [`prototype`](macro@prototype) attribute,
//! which also supports layering a prototype on top of a base prototype.

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

// Allows generated code to refer to `::sparsec` paths from within this crate.
extern crate self as sparsec;

#[macro_use]
mod macros;
#[doc(inline)]
pub use macros::*;

pub mod comp;
pub use comp::Component;

pub mod entity;

mod error;
pub use error::{Error, Result};

mod handle;
pub use handle::Handle;

mod prototype;
pub use prototype::{Assembler, Prototype};

pub mod registry;
pub use registry::Registry;

pub mod storage;

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;

pub mod world;
pub use world::World;
