//! Components and prototypes shared by unit tests and benchmarks.

#![allow(missing_docs)]

use parking_lot::Once;

use crate::{comp, prototype, Assembler, Component, Result};

pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[comp(sparsec_as(crate))]
#[derive(Debug, Clone, PartialEq)]
pub struct IntComponent {
    pub value: i32,
}

#[comp(sparsec_as(crate))]
#[derive(Debug, Clone, PartialEq)]
pub struct FloatComponent {
    pub value: f32,
}

/// A generic component for tests that need many distinct component types.
#[derive(Debug, Clone, PartialEq)]
pub struct CompN<const N: usize>(pub i32);

impl<const N: usize> Component for CompN<N> {}

/// An entity with `IntComponent { value: 5 }`.
#[prototype(sparsec_as(crate), assemble = assemble_my_prototype)]
pub struct MyPrototype;

fn assemble_my_prototype(assembler: &mut Assembler<'_>, (): ()) -> Result<()> {
    assembler.emplace(IntComponent { value: 5 });
    Ok(())
}

/// A [`MyPrototype`] that also has a `FloatComponent` with the given value.
#[prototype(sparsec_as(crate), base = MyPrototype, args = f32, assemble = assemble_my_extended)]
pub struct MyExtendedPrototype;

fn assemble_my_extended(assembler: &mut Assembler<'_>, value: f32) -> Result<()> {
    assembler.emplace(FloatComponent { value });
    Ok(())
}

/// A prototype whose assembly always fails after emplacing a component.
#[prototype(sparsec_as(crate), assemble = assemble_failing)]
pub struct FailingPrototype;

fn assemble_failing(assembler: &mut Assembler<'_>, (): ()) -> Result<()> {
    assembler.emplace(IntComponent { value: -1 });
    Err(crate::Error::assembly("intentional failure"))
}
