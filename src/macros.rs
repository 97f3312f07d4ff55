/// Implements [`Component`](crate::Component) for the applied type.
/// This macro does not modify the input.
///
/// # Options
/// Options are applied behind the attribute name in the form `#[comp(...)]`.
///
/// ## `sparsec_as($path)`
/// Refers to the sparsec crate through `$path` instead of `::sparsec`.
///
/// # Example
/// ```
/// use sparsec::comp;
///
/// #[comp]
/// struct Position(f32, f32);
///
/// #[comp]
/// struct Wrapper<T: Send + Sync + 'static>(T);
///
/// static_assertions::assert_impl_all!(Position: sparsec::Component);
/// static_assertions::assert_impl_all!(Wrapper<u8>: sparsec::Component);
/// ```
#[doc(inline)]
pub use sparsec_codegen::comp;

/// Implements [`Prototype`](crate::Prototype) for a unit struct.
///
/// The struct is rewritten to carry the [local ID](crate::entity::Local) of the entity
/// it was assembled for.
///
/// # Options
/// Options are applied behind the attribute name in the form `#[prototype(...)]`.
/// Multiple options are separated by commas.
///
/// ## `assemble = $path`
/// The function that emplaces the components of this prototype.
/// It is called with `(&mut Assembler<'_>, Args)` and returns `sparsec::Result<()>`.
/// If omitted, the prototype does not add any components of its own.
///
/// ## `args = $ty`
/// The argument type passed to `assemble`. Defaults to `()`.
///
/// ## `base = $ty`
/// Another prototype whose assembly runs before this one.
/// The base prototype is assembled with `Default::default()` as its arguments,
/// unless `base_args = $expr` is also specified.
///
/// ## `sparsec_as($path)`
/// Refers to the sparsec crate through `$path` instead of `::sparsec`.
///
/// # Example
/// ```
/// use sparsec::{comp, prototype, Assembler, Prototype, World};
///
/// #[comp]
/// struct Health(u32);
///
/// #[comp]
/// struct Wings(u8);
///
/// #[prototype(assemble = assemble_animal)]
/// struct Animal;
///
/// fn assemble_animal(assembler: &mut Assembler<'_>, (): ()) -> sparsec::Result<()> {
///     assembler.emplace(Health(100));
///     Ok(())
/// }
///
/// #[prototype(base = Animal, assemble = assemble_bird, args = u8)]
/// struct Bird;
///
/// fn assemble_bird(assembler: &mut Assembler<'_>, wings: u8) -> sparsec::Result<()> {
///     assembler.emplace(Wings(wings));
///     Ok(())
/// }
///
/// let mut world = World::default();
/// let bird: Bird = world.create_prototype(2).unwrap();
/// assert_eq!(world.get_component::<Health>(bird.entity()).map(|health| health.0), Some(100));
/// assert_eq!(world.get_component::<Wings>(bird.entity()).map(|wings| wings.0), Some(2));
/// ```
#[doc(inline)]
pub use sparsec_codegen::prototype;

// Asserts an API precondition.
//
// Preconditions are checked in debug mode when the `debug-preconditions` feature is enabled
// and in release mode when the `release-preconditions` feature is enabled.
// When unchecked, the condition is type-checked but never evaluated,
// and the caller is expected to fall back to a recoverable result.
cfg_if::cfg_if! {
    if #[cfg(any(
        all(debug_assertions, feature = "debug-preconditions"),
        all(not(debug_assertions), feature = "release-preconditions"),
    ))] {
        macro_rules! precondition {
            ($($args:tt)*) => { assert!($($args)*) };
        }
    } else {
        macro_rules! precondition {
            ($cond:expr $(, $($args:tt)*)?) => {
                if false {
                    let _ = $cond;
                }
            };
        }
    }
}
