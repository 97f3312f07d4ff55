//! The registry assigns global entity IDs across multiple worlds.
//!
//! A [`Global`] ID is bound to at most one `(world, local ID)` pair at a time.
//! An entity can be [relocated](Registry::relocate) to another world
//! while keeping its global ID.
//!
//! Each world records the global ID bound to each of its local IDs.
//! If an entity is destroyed directly through [`Registry::world_mut`],
//! its global ID is reported dead from then on,
//! even after the local ID is reused by another entity.
//! The global ID itself is only released by [`Registry::destroy`].

use std::collections::VecDeque;
use std::{any, fmt};

use rayon::prelude::*;

use crate::entity::ealloc::{self, Recycler};
use crate::entity::{Global, Local, Raw};
use crate::{Component, Error, Prototype, Result, World};

/// Identifies a world owned by a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldIndex(usize);

impl WorldIndex {
    /// Returns the position of the world in the registry.
    pub fn get(self) -> usize { self.0 }
}

impl fmt::Display for WorldIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "world index {}", self.0) }
}

/// Where a global ID currently lives.
#[derive(Debug, Clone, Copy)]
enum Binding {
    /// Allocated but not placed into any world.
    Staged,
    Bound { world: WorldIndex, local: Local },
}

/// Owns a set of worlds and the global entity IDs of their entities.
///
/// The recycler `R` decides which freed global ID is reused first.
pub struct Registry<R: Recycler<Global> = VecDeque<Global>> {
    worlds:  Vec<World>,
    /// The binding of each global ID, or `None` if the ID is not allocated.
    entries: Vec<Option<Binding>>,
    ealloc:  ealloc::Recycling<Global, R>,
}

static_assertions::assert_impl_all!(Registry: Send, Sync);

impl<R: Recycler<Global>> Default for Registry<R> {
    fn default() -> Self {
        Self { worlds: Vec::new(), entries: Vec::new(), ealloc: ealloc::Recycling::new() }
    }
}

impl<R: Recycler<Global>> Registry<R> {
    /// Creates a registry without any worlds.
    pub fn new() -> Self { Self::default() }

    /// Takes ownership of a world, returning its index.
    pub fn add_world(&mut self, world: World) -> WorldIndex {
        let index = WorldIndex(self.worlds.len());
        log::debug!("Registering {} as {index}", world.id());
        self.worlds.push(world);
        index
    }

    /// Returns the world at `index`.
    pub fn world(&self, index: WorldIndex) -> Option<&World> { self.worlds.get(index.0) }

    /// Returns the world at `index` mutably.
    ///
    /// Entities destroyed directly through the world are reported dead by the registry,
    /// and entities created directly through the world have no global ID.
    pub fn world_mut(&mut self, index: WorldIndex) -> Option<&mut World> {
        self.worlds.get_mut(index.0)
    }

    fn expect_world(&mut self, index: WorldIndex) -> Result<&mut World> {
        self.worlds.get_mut(index.0).ok_or(Error::UnknownWorld(index))
    }

    /// Iterates over all worlds in the order they were added.
    pub fn worlds(&self) -> impl Iterator<Item = (WorldIndex, &World)> + '_ {
        self.worlds.iter().enumerate().map(|(index, world)| (WorldIndex(index), world))
    }

    /// Calls `f` on every world concurrently.
    ///
    /// Each world is only visited by one thread, so `f` has exclusive access to it.
    pub fn par_for_each_world(&mut self, f: impl Fn(WorldIndex, &mut World) + Send + Sync) {
        self.worlds
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, world)| f(WorldIndex(index), world));
    }

    /// Returns the number of allocated global IDs, including staged ones.
    ///
    /// Global IDs of entities destroyed outside the registry
    /// are counted until they are freed by [`destroy`](Self::destroy).
    pub fn entity_count(&self) -> usize { self.ealloc.allocated() }

    fn allocate(&mut self, binding: Binding) -> Global {
        let global = self.ealloc.allocate();

        let index = global.to_primitive();
        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        let entry = self.entries.get(index).expect("just resized");
        assert!(entry.is_none(), "{global} was allocated twice");

        self.bind(global, binding);
        global
    }

    /// Points the entry of an allocated `global` to `binding`.
    ///
    /// The world of a bound entry must be registered.
    fn bind(&mut self, global: Global, binding: Binding) {
        if let Binding::Bound { world, local } = binding {
            let world = self.worlds.get_mut(world.0).expect("world checked by caller");
            world.bind_global(local, global);
        }

        let entry = self.entries.get_mut(global.to_primitive()).expect("global is allocated");
        *entry = Some(binding);
        log::trace!("Bound {global} as {binding:?}");
    }

    /// Returns the binding of `global`,
    /// or `None` if it is not allocated or its entity was destroyed outside the registry.
    fn binding(&self, global: Global) -> Option<Binding> {
        let binding = self.entries.get(global.to_primitive()).copied().flatten()?;
        match binding {
            Binding::Bound { world, local } => {
                let world = self.worlds.get(world.0)?;
                (world.global_of(local) == Some(global)).then_some(binding)
            }
            Binding::Staged => Some(binding),
        }
    }

    /// Creates an entity without components in a world.
    ///
    /// # Errors
    /// Returns [`Error::UnknownWorld`] if `world` is not registered.
    pub fn create_entity(&mut self, world: WorldIndex) -> Result<Global> {
        let local = self.expect_world(world)?.create_entity();
        Ok(self.allocate(Binding::Bound { world, local }))
    }

    /// Creates an entity in a world and assembles it with the prototype `P`.
    ///
    /// No global ID is allocated if assembly fails.
    ///
    /// # Errors
    /// Returns [`Error::UnknownWorld`] if `world` is not registered,
    /// or the error returned by the assembly.
    pub fn create_prototype<P: Prototype>(
        &mut self,
        world: WorldIndex,
        args: P::Args,
    ) -> Result<(Global, P)> {
        let prototype = self.expect_world(world)?.create_prototype::<P>(args)?;
        let global = self.allocate(Binding::Bound { world, local: prototype.entity() });
        Ok((global, prototype))
    }

    /// Allocates a global ID without placing it into any world.
    pub fn stage(&mut self) -> Global { self.allocate(Binding::Staged) }

    /// Places a staged entity into a world.
    ///
    /// # Errors
    /// - [`Error::DeadEntity`] if `global` is not allocated
    /// - [`Error::AlreadyBound`] if `global` is already placed in a world
    /// - [`Error::UnknownWorld`] if `world` is not registered
    pub fn place(&mut self, global: Global, world: WorldIndex) -> Result<Local> {
        match self.binding(global) {
            None => return Err(Error::DeadEntity(global)),
            Some(Binding::Bound { world: current, .. }) => {
                return Err(Error::AlreadyBound(global, current))
            }
            Some(Binding::Staged) => {}
        }

        let local = self.expect_world(world)?.create_entity();
        self.bind(global, Binding::Bound { world, local });
        log::trace!("Placed {global} into {world} as {local}");
        Ok(local)
    }

    /// Destroys an entity with all its components and frees its global ID.
    ///
    /// If the entity was already destroyed outside the registry,
    /// only the global ID is freed.
    ///
    /// # Errors
    /// Returns [`Error::DeadEntity`] if `global` is not allocated
    /// or its entity was destroyed outside the registry.
    pub fn destroy(&mut self, global: Global) -> Result<()> {
        let live = self.binding(global);
        let binding = self
            .entries
            .get_mut(global.to_primitive())
            .and_then(Option::take)
            .ok_or(Error::DeadEntity(global))?;
        self.ealloc.deallocate(global);

        match (binding, live) {
            (Binding::Bound { world, local }, Some(_)) => {
                let world = self.worlds.get_mut(world.0).expect("bound to an unregistered world");
                let destroyed = world.destroy_entity(local);
                assert!(destroyed, "registry entry of {global} points to dead {local}");
            }
            (Binding::Bound { world, local }, None) => {
                log::warn!("{global} ({local} in {world}) was destroyed outside the registry");
                return Err(Error::DeadEntity(global));
            }
            (Binding::Staged, _) => {}
        }

        log::trace!("Destroyed {global}");
        Ok(())
    }

    /// Checks whether `global` is allocated, whether staged or placed,
    /// and its entity has not been destroyed outside the registry.
    pub fn is_alive(&self, global: Global) -> bool { self.binding(global).is_some() }

    /// Returns the world and local ID that `global` is bound to.
    pub fn locate(&self, global: Global) -> Option<(WorldIndex, Local)> {
        match self.binding(global)? {
            Binding::Bound { world, local } => Some((world, local)),
            Binding::Staged => None,
        }
    }

    fn expect_bound(&self, global: Global) -> Result<(WorldIndex, Local)> {
        match self.binding(global) {
            Some(Binding::Bound { world, local }) => Ok((world, local)),
            Some(Binding::Staged) => Err(Error::NotBound(global)),
            None => Err(Error::DeadEntity(global)),
        }
    }

    fn bound_world(&self, global: Global) -> Option<(&World, Local)> {
        let (world, local) = self.locate(global)?;
        Some((self.worlds.get(world.0)?, local))
    }

    fn bound_world_mut(&mut self, global: Global) -> Result<(&mut World, Local)> {
        let (world, local) = self.expect_bound(global)?;
        Ok((self.expect_world(world)?, local))
    }

    /// Adds a component to an entity, replacing the existing one if present.
    ///
    /// # Errors
    /// Returns [`Error::DeadEntity`] or [`Error::NotBound`]
    /// if `global` is not placed in any world.
    pub fn emplace_component<T: Component>(&mut self, global: Global, value: T) -> Result<&mut T> {
        let (world, local) = self.bound_world_mut(global)?;
        Ok(world.emplace_component(local, value))
    }

    /// Checks whether an entity has a component of type `T`.
    ///
    /// Entities not placed in any world have no components.
    pub fn has_component<T: Component>(&self, global: Global) -> bool {
        self.bound_world(global).map_or(false, |(world, local)| world.has_component::<T>(local))
    }

    /// Gets a component of an entity.
    pub fn get_component<T: Component>(&self, global: Global) -> Option<&T> {
        let (world, local) = self.bound_world(global)?;
        world.get_component(local)
    }

    /// Gets a component of an entity mutably.
    pub fn get_component_mut<T: Component>(&mut self, global: Global) -> Option<&mut T> {
        let (world, local) = self.bound_world_mut(global).ok()?;
        world.get_component_mut(local)
    }

    /// Removes a component from an entity, returning it if it was present.
    pub fn destroy_component<T: Component>(&mut self, global: Global) -> Option<T> {
        match self.bound_world_mut(global) {
            Ok((world, local)) => world.destroy_component(local),
            Err(err) => {
                log::warn!("Cannot destroy {} of {global}: {err}", any::type_name::<T>());
                None
            }
        }
    }

    /// Moves an entity with all its components into another world.
    ///
    /// The global ID is preserved, and the new local ID is returned.
    /// All components are moved into the destination world
    /// before the entry of `global` is repointed,
    /// and the old local ID is freed last.
    ///
    /// # Errors
    /// - [`Error::DeadEntity`] or [`Error::NotBound`] if `global` is not placed in any world
    /// - [`Error::UnknownWorld`] if `dst` is not registered
    pub fn relocate(&mut self, global: Global, dst: WorldIndex) -> Result<Local> {
        let (src, local) = self.expect_bound(global)?;
        if dst.0 >= self.worlds.len() {
            return Err(Error::UnknownWorld(dst));
        }
        if src == dst {
            return Ok(local);
        }

        let (source, target) = pair_mut(&mut self.worlds, src.0, dst.0);
        let new_local = target.create_entity();
        source.move_components(local, target, new_local);

        self.bind(global, Binding::Bound { world: dst, local: new_local });

        let source = self.worlds.get_mut(src.0).expect("checked above");
        source.destroy_entity(local);

        log::debug!("Relocated {global} from {src} ({local}) to {dst} ({new_local})");
        Ok(new_local)
    }
}

/// Borrows two distinct elements of a slice mutably.
fn pair_mut<T>(slice: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    assert_ne!(first, second, "cannot borrow the same element twice");

    if first < second {
        let (left, right) = slice.split_at_mut(second);
        (&mut left[first], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(first);
        (&mut right[0], &mut left[second])
    }
}
