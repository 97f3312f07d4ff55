//! The world stores the components of a set of entities.

use std::sync::atomic::{self, AtomicU32};
use std::{any, fmt};

use bitvec::prelude::BitVec;
use indexmap::IndexMap;

use crate::entity::{ealloc, Global, Local, Raw};
use crate::storage::{Host, SparseSet};
use crate::{comp, Assembler, Component, Handle, Prototype, Result};

mod builder;
pub use builder::Builder;

pub mod query;
pub use query::Query;

/// Uniquely identifies a [`World`] within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldId(u32);

impl WorldId {
    fn next() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let id = COUNTER.fetch_add(1, atomic::Ordering::Relaxed);
        assert!(id != u32::MAX, "too many worlds created in this process");
        Self(id)
    }

    /// Returns the raw integer ID.
    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "World#{}", self.0) }
}

/// The data structure that stores all components of a set of entities.
///
/// Each component type is stored in its own [`SparseSet`],
/// which is created the first time a component of that type is emplaced.
/// An entity is identified by a [`Local`] ID,
/// which is recycled immediately after the entity is destroyed.
///
/// A world has no internal locking.
/// It can be sent to other threads,
/// but mutation always requires exclusive access.
pub struct World {
    id:            WorldId,
    name:          Option<String>,
    /// Sparse sets of each component type, keyed by the component type.
    pools:         IndexMap<comp::Key, Host>,
    ealloc:        ealloc::Recycling<Local>,
    /// The liveness of each local ID.
    alive:         BitVec,
    /// The registry binding of each local ID.
    globals:       Vec<Option<Global>>,
    /// The initial capacity of lazily created sparse sets.
    pool_capacity: usize,
}

static_assertions::assert_impl_all!(World: Send, Sync);

impl Default for World {
    fn default() -> Self { Builder::default().build() }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entities", &self.entity_count())
            .field("pools", &self.pools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self { Self::default() }

    /// Creates a builder to configure a new world.
    pub fn builder() -> Builder { Builder::default() }

    /// Returns the process-unique ID of this world.
    pub fn id(&self) -> WorldId { self.id }

    /// Returns the debug name of this world, if any.
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Creates an entity without any components.
    pub fn create_entity(&mut self) -> Local {
        let local = self.ealloc.allocate();

        let index = local.to_primitive();
        if self.alive.len() <= index {
            self.alive.resize(index + 1, false);
        }
        self.alive.set(index, true);

        log::trace!("{}: created {local}", self.id);
        local
    }

    /// Creates an entity and assembles it with the prototype `P`.
    ///
    /// If assembly fails, the partially assembled entity is destroyed
    /// and the assembly error is returned.
    pub fn create_prototype<P: Prototype>(&mut self, args: P::Args) -> Result<P> {
        let local = self.create_entity();

        let mut assembler = Assembler::new(self, local);
        match P::assemble(&mut assembler, args) {
            Ok(()) => Ok(P::from_entity(local)),
            Err(err) => {
                log::warn!(
                    "{}: failed to assemble {local} as {}: {err}",
                    self.id,
                    any::type_name::<P>()
                );
                self.destroy_entity(local);
                Err(err)
            }
        }
    }

    /// Checks whether `local` refers to a live entity.
    pub fn is_alive(&self, local: Local) -> bool {
        self.alive.get(local.to_primitive()).map_or(false, |bit| *bit)
    }

    /// Returns the global ID that a [`Registry`](crate::Registry) bound to `local`.
    ///
    /// The binding is cleared when the entity is destroyed,
    /// even if it is destroyed without going through the registry.
    pub fn global_of(&self, local: Local) -> Option<Global> {
        self.globals.get(local.to_primitive()).copied().flatten()
    }

    pub(crate) fn bind_global(&mut self, local: Local, global: Global) {
        assert!(self.is_alive(local), "cannot bind {global} to dead entity {local}");

        let index = local.to_primitive();
        if self.globals.len() <= index {
            self.globals.resize(index + 1, None);
        }
        *self.globals.get_mut(index).expect("just resized") = Some(global);
    }

    /// Returns the number of live entities.
    pub fn entity_count(&self) -> usize { self.ealloc.allocated() }

    /// Destroys an entity and all its components.
    ///
    /// Returns `false` if `local` is not a live entity.
    /// The cost is proportional to the number of component types ever used in this world.
    pub fn destroy_entity(&mut self, local: Local) -> bool {
        if !self.is_alive(local) {
            log::warn!("{}: cannot destroy {local} because it is not alive", self.id);
            return false;
        }

        for host in self.pools.values_mut() {
            host.destroy_if_present(local);
        }

        self.alive.set(local.to_primitive(), false);
        if let Some(global) = self.globals.get_mut(local.to_primitive()) {
            *global = None;
        }
        self.ealloc.deallocate(local);

        log::trace!("{}: destroyed {local}", self.id);
        true
    }

    /// Adds a component to an entity, replacing the existing one if present.
    ///
    /// # Panics
    /// Panics if `local` is not a live entity.
    pub fn emplace_component<T: Component>(&mut self, local: Local, value: T) -> &mut T {
        assert!(self.is_alive(local), "cannot emplace a component for dead entity {local}");

        let set = self.pool_or_create::<T>();
        let index = set.emplace(local, value);
        set.get_by_dense_mut(index)
    }

    /// Checks whether an entity has a component of type `T`.
    pub fn has_component<T: Component>(&self, local: Local) -> bool {
        self.pool::<T>().map_or(false, |set| set.has(local))
    }

    /// Gets a component of an entity.
    pub fn get_component<T: Component>(&self, local: Local) -> Option<&T> {
        self.pool::<T>()?.get(local)
    }

    /// Gets a component of an entity mutably.
    pub fn get_component_mut<T: Component>(&mut self, local: Local) -> Option<&mut T> {
        self.pool_mut::<T>()?.get_mut(local)
    }

    /// Removes a component from an entity, returning it if it was present.
    pub fn destroy_component<T: Component>(&mut self, local: Local) -> Option<T> {
        let value = self.pool_mut::<T>().and_then(|set| set.destroy_if_present(local));
        if value.is_none() {
            log::warn!(
                "{}: {local} does not have a component of type {} to destroy",
                self.id,
                any::type_name::<T>()
            );
        }
        value
    }

    /// Returns the number of components of type `T`.
    pub fn component_count<T: Component>(&self) -> usize { self.pool::<T>().map_or(0, SparseSet::len) }

    /// Returns the number of component types that have been used in this world.
    pub fn pool_count(&self) -> usize { self.pools.len() }

    /// Iterates over the type-erased pools of this world.
    pub fn pools(&self) -> impl Iterator<Item = &Host> + '_ { self.pools.values() }

    /// Returns the sparse set of `T`, if any component of type `T` has ever been emplaced.
    pub fn pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.pools.get(&comp::Key::of::<T>()).map(|host| host.typed::<T>())
    }

    pub(crate) fn pool_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.pools.get_mut(&comp::Key::of::<T>()).map(|host| host.typed_mut::<T>())
    }

    fn pool_or_create<T: Component>(&mut self) -> &mut SparseSet<T> {
        let (id, capacity) = (self.id, self.pool_capacity);
        let host = self.pools.entry(comp::Key::of::<T>()).or_insert_with(|| {
            log::trace!("{id}: creating pool for {}", any::type_name::<T>());
            Host::new(SparseSet::<T>::with_capacity(capacity))
        });
        host.typed_mut::<T>()
    }

    /// Creates a handle to the component of type `T` owned by `local`.
    ///
    /// Returns `None` if the entity does not have such a component.
    pub fn handle<T: Component>(&self, local: Local) -> Option<Handle<T>> {
        let generation = self.pool::<T>()?.generation(local)?;
        Some(Handle::new(self.id, local, generation))
    }

    /// Moves an entity with all its components into another world.
    ///
    /// Returns the new local ID in `dst`,
    /// or `None` if `local` is not a live entity.
    pub fn transfer(&mut self, local: Local, dst: &mut World) -> Option<Local> {
        if !self.is_alive(local) {
            log::warn!("{}: cannot transfer {local} because it is not alive", self.id);
            return None;
        }

        let target = dst.create_entity();
        self.move_components(local, dst, target);
        self.destroy_entity(local);
        Some(target)
    }

    /// Moves all components of `src` into the entity `target` of `dst`.
    ///
    /// `src` remains alive without any components.
    pub(crate) fn move_components(&mut self, src: Local, dst: &mut World, target: Local) {
        let mut moved = 0_usize;
        for host in self.pools.values_mut() {
            if host.relocate(src, dst, target) {
                moved += 1;
            }
        }
        log::debug!("{}: moved {moved} components of {src} to {target} in {}", self.id, dst.id);
    }

    /// Calls `f` on every component of type `T`.
    pub fn each<T: Component>(&mut self, f: impl FnMut(&mut T)) {
        if let Some(set) = self.pool_mut::<T>() {
            set.values_mut().iter_mut().for_each(f);
        }
    }

    /// Calls `f` with the components of every entity that has all component types in `Q`.
    ///
    /// `Q` is a tuple of component types.
    /// The sparse set of the first listed type is scanned,
    /// so listing the rarest type first is the cheapest.
    ///
    /// # Panics
    /// Panics if the same component type is listed more than once.
    ///
    /// # Example
    /// ```
    /// use sparsec::{comp, World};
    ///
    /// #[comp]
    /// struct Position(f32);
    /// #[comp]
    /// struct Velocity(f32);
    ///
    /// let mut world = World::new();
    /// let entity = world.create_entity();
    /// world.emplace_component(entity, Position(1.0));
    /// world.emplace_component(entity, Velocity(0.5));
    ///
    /// world.filter::<(Position, Velocity)>(|(position, velocity)| position.0 += velocity.0);
    /// assert_eq!(world.get_component::<Position>(entity).map(|position| position.0), Some(1.5));
    /// ```
    pub fn filter<Q: Query>(&mut self, f: impl for<'t> FnMut(Q::Item<'t>)) { Q::for_each(self, f) }

    /// Calls `f` with every entity that has all component types in `Q`,
    /// allowing `f` to mutate the world.
    ///
    /// The length of the scanned sparse set is re-read after every call,
    /// so entities created during the scan may be visited.
    /// If `f` destroys any entity or component of the first listed type,
    /// including those of the visited entity, the visitation order is unspecified.
    /// Removal moves the last component of the set into the vacated position,
    /// so destroying the visited entity skips the entity moved into its place,
    /// and other entities may be skipped or visited twice.
    ///
    /// # Panics
    /// Panics if the same component type is listed more than once.
    pub fn filter_entities<Q: Query>(&mut self, mut f: impl FnMut(&mut World, Local)) {
        query::assert_distinct(&Q::keys());

        let mut index = 0;
        while let Some(owner) = Q::owner_at(self, index) {
            if Q::matches(self, owner) {
                f(&mut *self, owner);
            }
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests;
