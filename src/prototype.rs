use crate::entity::Local;
use crate::{Component, Result, World};

/// A kind of entity with a fixed set of initial components.
///
/// Usually implemented through the [`#[prototype]`](macro@crate::prototype) attribute.
/// A prototype that extends another prototype
/// calls the base prototype's [`assemble`](Self::assemble) before emplacing its own components.
pub trait Prototype: Sized {
    /// The arguments passed to [`assemble`](Self::assemble).
    type Args;

    /// Wraps the local ID of an entity of this kind.
    fn from_entity(entity: Local) -> Self;

    /// Returns the local ID of the entity.
    fn entity(&self) -> Local;

    /// Emplaces the initial components of a newly created entity.
    fn assemble(assembler: &mut Assembler<'_>, args: Self::Args) -> Result<()>;
}

/// Emplaces components into an entity under assembly.
pub struct Assembler<'w> {
    world:  &'w mut World,
    entity: Local,
}

impl<'w> Assembler<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Local) -> Self { Self { world, entity } }

    /// The entity under assembly.
    pub fn entity(&self) -> Local { self.entity }

    /// The world that the entity is created in.
    pub fn world(&self) -> &World { self.world }

    /// Adds a component to the entity, replacing the existing one if present.
    pub fn emplace<T: Component>(&mut self, value: T) -> &mut T {
        self.world.emplace_component(self.entity, value)
    }

    /// Checks whether the entity already has a component of type `T`.
    pub fn has<T: Component>(&self) -> bool { self.world.has_component::<T>(self.entity) }

    /// Gets a component emplaced earlier in the assembly.
    pub fn get<T: Component>(&self) -> Option<&T> { self.world.get_component(self.entity) }

    /// Gets a component emplaced earlier in the assembly mutably.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_component_mut(self.entity)
    }
}
