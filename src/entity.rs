//! An entity is a lightweight identifier that owns components.
//!
//! Entities do not carry any data themselves.
//! There are two kinds of entity IDs:
//!
//! - A [`Local`] ID is scoped to one [`World`](crate::World).
//!   It is the row key into every component pool of that world.
//! - A [`Global`] ID is scoped to one [`Registry`](crate::Registry).
//!   It is bound to exactly one `(world, local ID)` pair at a time,
//!   and keeps its value when the entity is relocated to another world.
//!
//! Both kinds of IDs are recycled immediately after the entity is destroyed.
//! Use a [`Handle`](crate::Handle) to detect whether a component reference has gone stale.

use std::fmt;

pub mod ealloc;

mod generation;
pub use generation::Generation;

mod raw;
pub use raw::{Primitive, Raw};

macro_rules! decl_raw {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw integer ID.
            pub const fn new(id: u32) -> Self { Self(id) }

            /// Returns the raw integer ID.
            pub const fn get(self) -> u32 { self.0 }
        }

        impl Raw for $name {
            fn from_primitive(i: Primitive) -> Self {
                Self(i.try_into().expect("entity ID space exhausted"))
            }

            fn to_primitive(self) -> Primitive { self.0.try_into().expect("usize >= u32") }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

decl_raw! {
    /// An entity ID scoped to a single [`World`](crate::World).
    Local
}

decl_raw! {
    /// An entity ID scoped to a [`Registry`](crate::Registry).
    Global
}
