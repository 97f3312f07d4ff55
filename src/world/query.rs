//! Multi-component filters over a [`World`].
//!
//! A query is a tuple of up to eight distinct component types.
//! The sparse set of the first listed type is scanned in dense order,
//! and each owner is tested for membership in the remaining sets.

use indexmap::IndexMap;
use itertools::Itertools;

use super::World;
use crate::comp::Key;
use crate::entity::{Local, Raw};
use crate::storage::Host;
use crate::Component;

/// A tuple of component types that can be filtered together.
///
/// This trait is implemented for tuples of 1 to 8 [`Component`] types.
/// There is no implementation for `()`, so an empty query does not compile.
pub trait Query {
    /// The mutable references passed to the filter callback.
    type Item<'t>;

    /// Returns the keys of the component types in declaration order.
    fn keys() -> Vec<Key>;

    /// Returns the owner at a dense index of the first listed component type.
    fn owner_at(world: &World, index: usize) -> Option<Local>;

    /// Checks whether `local` is alive and has every component type in this query.
    fn matches(world: &World, local: Local) -> bool;

    /// Calls `f` with the components of every matching entity.
    fn for_each<F: for<'t> FnMut(Self::Item<'t>)>(world: &mut World, f: F);
}

/// Asserts that no component type is requested twice,
/// which would alias mutable references.
pub(crate) fn assert_distinct(keys: &[Key]) {
    if let Some((key, _)) = keys.iter().sorted().tuple_windows().find(|(a, b)| a == b) {
        panic!("component type {key} is requested more than once in the same query");
    }
}

/// Borrows the hosts of `keys` mutably at the same time.
///
/// Returns `None` if any of the types has no host.
/// The keys must be distinct.
fn disjoint_hosts<'t, const N: usize>(
    pools: &'t mut IndexMap<Key, Host>,
    keys: &[Key; N],
) -> Option<[&'t mut Host; N]> {
    let mut indices = [0; N];
    for (index, key) in indices.iter_mut().zip(keys) {
        *index = pools.get_index_of(key)?;
    }

    let mut hosts: [Option<&'t mut Host>; N] = [(); N].map(|()| None);
    for (index, host) in pools.values_mut().enumerate() {
        if let Some(position) = indices.iter().position(|&i| i == index) {
            hosts[position] = Some(host);
        }
    }

    Some(hosts.map(|host| host.expect("query keys must be distinct")))
}

macro_rules! impl_query {
    ($first:ident $first_var:ident $(, $rest:ident $rest_var:ident)*) => {
        impl<$first: Component $(, $rest: Component)*> Query for ($first, $($rest,)*) {
            type Item<'t> = (&'t mut $first, $(&'t mut $rest,)*);

            fn keys() -> Vec<Key> { vec![Key::of::<$first>() $(, Key::of::<$rest>())*] }

            fn owner_at(world: &World, index: usize) -> Option<Local> {
                let set = world.pool::<$first>()?;
                (index < set.len()).then(|| set.owner_of(index))
            }

            fn matches(world: &World, local: Local) -> bool {
                world.is_alive(local)
                    && world.has_component::<$first>(local)
                    $(&& world.has_component::<$rest>(local))*
            }

            fn for_each<F: for<'t> FnMut(Self::Item<'t>)>(world: &mut World, mut f: F) {
                let keys = [Key::of::<$first>() $(, Key::of::<$rest>())*];
                assert_distinct(&keys);

                let alive = &world.alive;
                let Some(hosts) = disjoint_hosts(&mut world.pools, &keys) else {
                    // an unused component type matches nothing
                    return;
                };
                let [$first_var, $($rest_var,)*] = hosts;
                let $first_var = $first_var.typed_mut::<$first>();
                $(let $rest_var = $rest_var.typed_mut::<$rest>();)*

                let mut index = 0;
                while index < $first_var.len() {
                    let owner = $first_var.owner_of(index);
                    let is_alive = alive.get(owner.to_primitive()).map_or(false, |bit| *bit);

                    if is_alive $(&& $rest_var.has(owner))* {
                        f((
                            $first_var.get_by_dense_mut(index),
                            $($rest_var.get_mut(owner).expect("membership checked above"),)*
                        ));
                    }

                    index += 1;
                }
            }
        }
    };
}

impl_query!(A a);
impl_query!(A a, B b);
impl_query!(A a, B b, C c);
impl_query!(A a, B b, C c, D d);
impl_query!(A a, B b, C c, D d, E e);
impl_query!(A a, B b, C c, D d, E e, F1 f1);
impl_query!(A a, B b, C c, D d, E e, F1 f1, G g);
impl_query!(A a, B b, C c, D d, E e, F1 f1, G g, H h);
