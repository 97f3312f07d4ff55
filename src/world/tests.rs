use crate::entity::Local;
use crate::test_util::{
    self, CompN, FailingPrototype, FloatComponent, IntComponent, MyExtendedPrototype, MyPrototype,
};
use crate::{Error, Prototype, World};

fn count<Q: super::Query>(world: &mut World) -> usize {
    let mut count = 0;
    world.filter_entities::<Q>(|_, _| count += 1);
    count
}

#[test]
fn test_create_recycles_ids() {
    test_util::init();

    let mut world = World::new();
    let entities: Vec<_> = (0..6).map(|_| world.create_entity()).collect();
    assert_eq!(world.entity_count(), 6);

    for &entity in &entities[1..4] {
        assert!(world.destroy_entity(entity));
    }
    assert_eq!(world.entity_count(), 3);
    assert!(!world.is_alive(entities[2]));

    let mut reused: Vec<_> = (0..3).map(|_| world.create_entity()).collect();
    reused.sort();
    assert_eq!(reused, &entities[1..4], "freed IDs should be reused before new IDs");
    assert_eq!(world.create_entity(), Local::new(6));
}

#[test]
fn test_destroy_dead_entity() {
    test_util::init();

    let mut world = World::new();
    let entity = world.create_entity();
    assert!(world.destroy_entity(entity));
    assert!(!world.destroy_entity(entity));
    assert!(!world.destroy_entity(Local::new(100)));
}

#[test]
fn test_component_lifecycle() {
    test_util::init();

    let mut world = World::new();
    let entity = world.create_entity();
    let other = world.create_entity();
    assert!(!world.has_component::<IntComponent>(entity), "unused types should be absent");
    assert_eq!(world.pool_count(), 0);

    world.emplace_component(entity, IntComponent { value: 5 });
    world.emplace_component(other, IntComponent { value: 6 });
    assert!(world.has_component::<IntComponent>(entity));
    assert_eq!(world.get_component::<IntComponent>(entity), Some(&IntComponent { value: 5 }));

    world.get_component_mut::<IntComponent>(entity).expect("just emplaced").value += 1;
    assert_eq!(world.get_component::<IntComponent>(entity).map(|comp| comp.value), Some(6));

    assert_eq!(world.destroy_component::<IntComponent>(other), Some(IntComponent { value: 6 }));
    assert_eq!(
        world.get_component::<IntComponent>(entity),
        Some(&IntComponent { value: 6 }),
        "destroying another entity's component should not affect this entity",
    );

    assert_eq!(world.destroy_component::<IntComponent>(other), None);
    assert_eq!(world.destroy_component::<FloatComponent>(entity), None);
    assert_eq!(world.pool_count(), 1, "destroying an unused type should not create a pool");

    assert_eq!(world.destroy_component::<IntComponent>(entity), Some(IntComponent { value: 6 }));
    assert!(!world.has_component::<IntComponent>(entity));
    assert_eq!(world.component_count::<IntComponent>(), 0);
}

#[test]
fn test_emplace_replaces() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let value = world.emplace_component(entity, IntComponent { value: 2 });
    assert_eq!(value.value, 2);
    assert_eq!(world.component_count::<IntComponent>(), 1);
}

#[test]
#[should_panic = "cannot emplace a component for dead entity Local#0"]
fn test_emplace_dead() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.destroy_entity(entity);
    world.emplace_component(entity, IntComponent { value: 1 });
}

#[test]
fn test_filter_overlap() {
    test_util::init();

    let mut world = World::new();
    let a = world.create_entity();
    world.emplace_component(a, IntComponent { value: 1 });
    let ab = world.create_entity();
    world.emplace_component(ab, IntComponent { value: 2 });
    world.emplace_component(ab, FloatComponent { value: 2.0 });
    let b = world.create_entity();
    world.emplace_component(b, FloatComponent { value: 3.0 });

    assert_eq!(count::<(IntComponent, FloatComponent)>(&mut world), 1);
    assert_eq!(count::<(FloatComponent, IntComponent)>(&mut world), 1);
    assert_eq!(count::<(IntComponent,)>(&mut world), 2);
    assert_eq!(count::<(FloatComponent,)>(&mut world), 2);

    let mut visited = Vec::new();
    world.filter::<(IntComponent, FloatComponent)>(|(int, float)| {
        visited.push((int.value, float.value));
        int.value *= 10;
        float.value *= 10.0;
    });
    assert_eq!(visited, vec![(2, 2.0)]);
    assert_eq!(world.get_component::<IntComponent>(ab).map(|comp| comp.value), Some(20));
    assert_eq!(world.get_component::<FloatComponent>(ab).map(|comp| comp.value), Some(20.0));
    assert_eq!(world.get_component::<IntComponent>(a).map(|comp| comp.value), Some(1));
}

#[test]
fn test_filter_unused_type() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });

    let mut called = false;
    world.filter::<(IntComponent, CompN<0>)>(|_| called = true);
    world.filter::<(CompN<1>, IntComponent)>(|_| called = true);
    assert!(!called);
}

#[test]
fn test_filter_many() {
    let mut world = World::new();
    for i in 0..4 {
        let entity = world.create_entity();
        world.emplace_component(entity, CompN::<0>(i));
        world.emplace_component(entity, CompN::<1>(i));
        world.emplace_component(entity, CompN::<2>(i));
        if i % 2 == 0 {
            world.emplace_component(entity, CompN::<3>(i));
        }
    }

    let mut sum = 0;
    world.filter::<(CompN<3>, CompN<2>, CompN<1>, CompN<0>)>(|(c3, c2, c1, c0)| {
        sum += c3.0 + c2.0 + c1.0 + c0.0;
    });
    assert_eq!(sum, (0 + 2) * 4);
}

#[test]
#[should_panic = "is requested more than once in the same query"]
fn test_filter_duplicate() {
    let mut world = World::new();
    world.filter::<(IntComponent, FloatComponent, IntComponent)>(|_| {});
}

#[test]
fn test_each() {
    let mut world = World::new();
    for value in 0..5 {
        let entity = world.create_entity();
        world.emplace_component(entity, IntComponent { value });
    }

    world.each::<IntComponent>(|comp| comp.value += 1);
    world.each::<FloatComponent>(|_| unreachable!());

    let mut values: Vec<_> = world
        .pool::<IntComponent>()
        .expect("pool exists")
        .values()
        .iter()
        .map(|comp| comp.value)
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_destroy_range() {
    test_util::init();

    let mut world = World::new();
    let entities: Vec<_> = (0..30)
        .map(|i| {
            let entity = world.create_entity();
            world.emplace_component(entity, IntComponent { value: i });
            world.emplace_component(entity, FloatComponent { value: i as f32 });
            entity
        })
        .collect();

    for &entity in &entities[4..20] {
        world.destroy_entity(entity);
    }

    assert_eq!(world.component_count::<IntComponent>(), 14);
    assert_eq!(world.component_count::<FloatComponent>(), 14);
    assert_eq!(count::<(IntComponent, FloatComponent)>(&mut world), 14);

    for pool in world.pools() {
        assert_eq!(pool.len(), 14, "{} should have 14 components", pool.key());
    }
    world.pool::<IntComponent>().expect("pool exists").assert_consistent();
    world.pool::<FloatComponent>().expect("pool exists").assert_consistent();

    for (i, &entity) in entities.iter().enumerate() {
        let expected = (i < 4 || i >= 20).then_some(IntComponent { value: i as i32 });
        assert_eq!(world.get_component::<IntComponent>(entity), expected.as_ref());
    }
}

#[test]
fn test_filter_entities_mutation() {
    test_util::init();

    let mut world = World::new();
    for value in 0..10 {
        let entity = world.create_entity();
        world.emplace_component(entity, IntComponent { value });
        if value % 3 == 0 {
            world.emplace_component(entity, FloatComponent { value: 0.0 });
        }
    }

    let mut visited = 0;
    world.filter_entities::<(IntComponent, FloatComponent)>(|world, entity| {
        visited += 1;
        let value = world.get_component::<IntComponent>(entity).expect("matched").value;
        world.get_component_mut::<FloatComponent>(entity).expect("matched").value = value as f32;

        let spawned = world.create_entity();
        world.emplace_component(spawned, IntComponent { value: -value });
    });

    assert_eq!(visited, 4);
    assert_eq!(world.entity_count(), 14);
    assert_eq!(world.component_count::<IntComponent>(), 14);

    let mut floats: Vec<_> = world
        .pool::<FloatComponent>()
        .expect("pool exists")
        .values()
        .iter()
        .map(|comp| comp.value)
        .collect();
    floats.sort_by(f32::total_cmp);
    assert_eq!(floats, vec![0.0, 3.0, 6.0, 9.0]);
}

#[test]
fn test_filter_entities_destroy_visited() {
    test_util::init();

    let mut world = World::new();
    for value in 0..8 {
        let entity = world.create_entity();
        world.emplace_component(entity, IntComponent { value });
    }

    let mut visited = Vec::new();
    world.filter_entities::<(IntComponent,)>(|world, entity| {
        let value = world.get_component::<IntComponent>(entity).expect("filtered").value;
        visited.push(value);
        if value % 2 == 0 {
            world.destroy_entity(entity);
        }
    });

    // each destroyed entity is replaced by the last one, which is then skipped
    let pool = world.pool::<IntComponent>().expect("pool exists");
    pool.assert_consistent();
    let mut survivors: Vec<_> = pool.values().iter().map(|comp| comp.value).collect();
    survivors.sort_unstable();
    assert_eq!(survivors, vec![1, 3, 5, 6, 7]);
    for skipped in [5, 6, 7] {
        assert!(!visited.contains(&skipped), "{skipped} was moved behind the scan");
    }
    assert_eq!(visited.len(), 5);
}

#[test]
fn test_filter_entities_destroy_all_visited() {
    test_util::init();

    let mut world = World::new();
    let entities: Vec<_> = (0..4)
        .map(|value| {
            let entity = world.create_entity();
            world.emplace_component(entity, IntComponent { value });
            entity
        })
        .collect();

    let mut visited = Vec::new();
    world.filter_entities::<(IntComponent,)>(|world, entity| {
        visited.push(entity);
        assert!(world.destroy_entity(entity));
    });

    assert_eq!(visited, entities[..2]);
    assert_eq!(world.entity_count(), 2);
    for &entity in &entities[2..] {
        assert!(world.is_alive(entity));
        assert!(world.has_component::<IntComponent>(entity));
    }
    world.pool::<IntComponent>().expect("pool exists").assert_consistent();
}

#[test]
fn test_prototype() {
    test_util::init();

    let mut world = World::new();
    let base: MyPrototype = world.create_prototype(()).expect("assembly succeeds");
    assert_eq!(world.get_component::<IntComponent>(base.entity()), Some(&IntComponent { value: 5 }));
    assert!(!world.has_component::<FloatComponent>(base.entity()));

    let extended: MyExtendedPrototype = world.create_prototype(7.5).expect("assembly succeeds");
    assert_eq!(
        world.get_component::<IntComponent>(extended.entity()),
        Some(&IntComponent { value: 5 }),
        "base prototype should be assembled first",
    );
    assert_eq!(
        world.get_component::<FloatComponent>(extended.entity()),
        Some(&FloatComponent { value: 7.5 }),
    );
}

#[test]
fn test_prototype_failure() {
    test_util::init();

    let mut world = World::new();
    let result = world.create_prototype::<FailingPrototype>(());
    assert!(matches!(result, Err(Error::Assembly(_))));
    assert_eq!(world.entity_count(), 0, "partially assembled entity should be destroyed");
    assert_eq!(world.component_count::<IntComponent>(), 0);
}

#[test]
fn test_handle_lifecycle() {
    test_util::init();

    let mut world = World::new();
    let entity = world.create_entity();
    assert!(world.handle::<IntComponent>(entity).is_none());

    world.emplace_component(entity, IntComponent { value: 5 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");
    assert!(handle.is_valid(&world));
    assert_eq!(handle.entity(), entity);
    assert_eq!(handle.get(&world).map(|comp| comp.value).ok(), Some(5));

    handle.get_mut(&mut world).expect("handle is valid").value = 8;
    assert_eq!(handle.try_get(&world), Some(&IntComponent { value: 8 }));

    let owner: MyPrototype = handle.owner(&world).expect("handle is valid");
    assert_eq!(owner.entity(), entity);
}

#[test]
fn test_handle_stale_after_reuse() {
    test_util::init();

    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");

    world.destroy_entity(entity);
    assert!(!handle.is_valid(&world));

    let reused = world.create_entity();
    assert_eq!(reused, entity, "the local ID should be recycled");
    world.emplace_component(reused, IntComponent { value: 2 });

    assert!(!handle.is_valid(&world), "handle should not alias the new occupant");
    assert_eq!(handle.try_get(&world), None);
    assert_eq!(handle.try_get_mut(&mut world), None);
    assert!(matches!(handle.owner::<MyPrototype>(&world), Err(Error::InvalidHandle)));
}

#[test]
fn test_handle_stale_after_replace() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");

    world.emplace_component(entity, IntComponent { value: 2 });
    assert!(!handle.is_valid(&world));
    assert!(world.handle::<IntComponent>(entity).expect("replaced").is_valid(&world));
}

#[test]
fn test_handle_survives_swap() {
    let mut world = World::new();
    let first = world.create_entity();
    let second = world.create_entity();
    world.emplace_component(first, IntComponent { value: 1 });
    world.emplace_component(second, IntComponent { value: 2 });
    let handle = world.handle::<IntComponent>(second).expect("just emplaced");

    world.destroy_component::<IntComponent>(first);
    assert_eq!(handle.try_get(&world), Some(&IntComponent { value: 2 }));
}

#[test]
fn test_handle_foreign_world() {
    let mut world = World::new();
    let mut other = World::builder().name("other").build();
    assert_ne!(world.id(), other.id());
    assert_eq!(other.name(), Some("other"));

    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");

    let other_entity = other.create_entity();
    other.emplace_component(other_entity, IntComponent { value: 2 });

    assert!(!handle.is_valid(&other));
    assert_eq!(handle.try_get(&other), None);
    assert!(matches!(
        handle.owner::<MyPrototype>(&other),
        Err(Error::ForeignWorld { expected, actual }) if expected == world.id() && actual == other.id()
    ));
}

#[test]
#[cfg(all(debug_assertions, feature = "debug-preconditions"))]
#[should_panic = "cannot resolve"]
fn test_handle_get_stale_precondition() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");
    world.destroy_entity(entity);

    let _ = handle.get(&world);
}

#[test]
#[cfg(not(all(debug_assertions, feature = "debug-preconditions")))]
fn test_handle_get_stale_error() {
    let mut world = World::new();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    let handle = world.handle::<IntComponent>(entity).expect("just emplaced");
    world.destroy_entity(entity);

    assert!(matches!(handle.get(&world), Err(Error::InvalidHandle)));
}

#[test]
fn test_transfer() {
    test_util::init();

    let mut src = World::new();
    let mut dst = World::new();
    dst.create_entity();

    let entity = src.create_entity();
    src.emplace_component(entity, IntComponent { value: 3 });
    src.emplace_component(entity, FloatComponent { value: 4.0 });

    let moved = src.transfer(entity, &mut dst).expect("entity is alive");
    assert_eq!(moved, Local::new(1));
    assert!(!src.is_alive(entity));
    assert_eq!(src.component_count::<IntComponent>(), 0);
    assert_eq!(dst.get_component::<IntComponent>(moved), Some(&IntComponent { value: 3 }));
    assert_eq!(dst.get_component::<FloatComponent>(moved), Some(&FloatComponent { value: 4.0 }));

    assert_eq!(src.transfer(entity, &mut dst), None);
}

#[test]
fn test_builder_capacity() {
    let mut world = World::builder().entity_capacity(64).pool_capacity(16).build();
    let entity = world.create_entity();
    world.emplace_component(entity, IntComponent { value: 1 });
    assert_eq!(world.component_count::<IntComponent>(), 1);
    assert!(format!("{world:?}").contains("entities: 1"));
}
