use super::{World, WorldId};
use crate::entity::ealloc;

/// Configures a new [`World`].
#[derive(Debug, Default)]
pub struct Builder {
    name:            Option<String>,
    entity_capacity: usize,
    pool_capacity:   usize,
}

impl Builder {
    /// Sets the debug name of the world.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reserves space for the liveness of `capacity` entities.
    pub fn entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Sets the initial capacity of each sparse set created in the world.
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Builds the world.
    pub fn build(self) -> World {
        let id = WorldId::next();
        match &self.name {
            Some(name) => log::debug!("{id}: created world {name:?}"),
            None => log::debug!("{id}: created world"),
        }

        World {
            id,
            name: self.name,
            pools: Default::default(),
            ealloc: ealloc::Recycling::new(),
            alive: bitvec::vec::BitVec::with_capacity(self.entity_capacity),
            globals: Vec::new(),
            pool_capacity: self.pool_capacity,
        }
    }
}
