use std::marker::PhantomData;
use std::{any, fmt};

use crate::entity::{Generation, Local};
use crate::world::WorldId;
use crate::{Component, Error, Prototype, Result, World};

/// A revalidatable reference to a component of type `T`.
///
/// A handle does not borrow the world.
/// It remembers the world, the owning entity and the generation of the storage slot,
/// and is resolved again on every access.
/// Once the component is destroyed or replaced, the generation no longer matches
/// and the handle becomes permanently invalid,
/// even if the local ID is later reused by another entity.
pub struct Handle<T: Component> {
    world:      WorldId,
    owner:      Local,
    generation: Generation,
    _ph:        PhantomData<fn() -> T>,
}

impl<T: Component> Clone for Handle<T> {
    fn clone(&self) -> Self { *self }
}

impl<T: Component> Copy for Handle<T> {}

impl<T: Component> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.world == other.world
            && self.owner == other.owner
            && self.generation == other.generation
    }
}

impl<T: Component> Eq for Handle<T> {}

impl<T: Component> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &any::type_name::<T>())
            .field("world", &self.world)
            .field("owner", &self.owner)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T: Component> Handle<T> {
    pub(crate) fn new(world: WorldId, owner: Local, generation: Generation) -> Self {
        Self { world, owner, generation, _ph: PhantomData }
    }

    /// The world that this handle was created from.
    pub fn world(&self) -> WorldId { self.world }

    /// The entity that owned the component when this handle was created.
    pub fn entity(&self) -> Local { self.owner }

    /// The slot generation when this handle was created.
    pub fn generation(&self) -> Generation { self.generation }

    fn check(&self, world: &World) -> Result<()> {
        if world.id() != self.world {
            return Err(Error::ForeignWorld { expected: self.world, actual: world.id() });
        }

        let current = world.pool::<T>().and_then(|set| set.generation(self.owner));
        if current == Some(self.generation) {
            Ok(())
        } else {
            Err(Error::InvalidHandle)
        }
    }

    /// Checks whether the referenced component still exists in `world`.
    pub fn is_valid(&self, world: &World) -> bool { self.check(world).is_ok() }

    /// Resolves the handle.
    ///
    /// # Errors
    /// Returns [`Error::ForeignWorld`] if `world` is not the world of this handle,
    /// or [`Error::InvalidHandle`] if the component no longer exists.
    ///
    /// # Panics
    /// Panics instead of returning an error if preconditions are checked in this build.
    pub fn get<'w>(&self, world: &'w World) -> Result<&'w T> {
        let checked = self.check(world);
        precondition!(checked.is_ok(), "cannot resolve {:?}: {checked:?}", self);
        checked?;
        self.try_get(world).ok_or(Error::InvalidHandle)
    }

    /// Resolves the handle mutably.
    ///
    /// # Errors
    /// Returns [`Error::ForeignWorld`] if `world` is not the world of this handle,
    /// or [`Error::InvalidHandle`] if the component no longer exists.
    ///
    /// # Panics
    /// Panics instead of returning an error if preconditions are checked in this build.
    pub fn get_mut<'w>(&self, world: &'w mut World) -> Result<&'w mut T> {
        let checked = self.check(world);
        precondition!(checked.is_ok(), "cannot resolve {:?}: {checked:?}", self);
        checked?;
        self.try_get_mut(world).ok_or(Error::InvalidHandle)
    }

    /// Resolves the handle, returning `None` if it is not valid for `world`.
    ///
    /// Unlike [`get`](Self::get), this method never panics.
    pub fn try_get<'w>(&self, world: &'w World) -> Option<&'w T> {
        self.check(world).ok()?;
        world.get_component::<T>(self.owner)
    }

    /// Resolves the handle mutably, returning `None` if it is not valid for `world`.
    ///
    /// Unlike [`get_mut`](Self::get_mut), this method never panics.
    pub fn try_get_mut<'w>(&self, world: &'w mut World) -> Option<&'w mut T> {
        self.check(world).ok()?;
        world.get_component_mut::<T>(self.owner)
    }

    /// Returns the entity that owns the referenced component as a prototype value.
    ///
    /// The owner is read from the sparse set at the component's current dense position.
    ///
    /// # Errors
    /// Same as [`get`](Self::get).
    pub fn owner<P: Prototype>(&self, world: &World) -> Result<P> {
        self.check(world)?;
        let set = world.pool::<T>().ok_or(Error::InvalidHandle)?;
        let index = set.dense_index(self.owner).ok_or(Error::InvalidHandle)?;
        Ok(P::from_entity(set.owner_of(index)))
    }
}
