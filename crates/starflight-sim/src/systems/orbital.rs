//! Orbital motion for stars, planets and moons.
//!
//! Bodies are advanced roots-first, so a moon always reads its parent's
//! position from this tick rather than the previous one.

use hecs::{Entity, World};

use starflight_core::components::OrbitalBody;
use starflight_core::types::Transform;

use crate::capabilities::Orbiting;
use crate::engine::resolve;

pub fn run(world: &mut World, roster: &[Entity], dt: f64) {
    let mut order: Vec<(usize, Entity)> = roster
        .iter()
        .filter(|&&entity| world.get::<&OrbitalBody>(entity).is_ok())
        .map(|&entity| (parent_depth(world, entity, roster.len()), entity))
        .collect();
    // Stable, so registration order breaks ties.
    order.sort_by_key(|&(depth, _)| depth);

    for (_, entity) in order {
        let parent_position = world
            .get::<&OrbitalBody>(entity)
            .ok()
            .and_then(|orbit| orbit.parent)
            .and_then(|parent| resolve(world, parent))
            .and_then(|parent| world.get::<&Transform>(parent).ok().map(|t| t.position));

        if let Ok((transform, orbit)) =
            world.query_one_mut::<(&mut Transform, &mut OrbitalBody)>(entity)
        {
            if let Some(center) = parent_position {
                orbit.orbit_center = center;
            }
            orbit.spin(dt);
            transform.position = orbit.orbit_step(transform.position, dt);
        }
    }
}

/// Number of live ancestors. Bounded so a parent cycle cannot loop forever.
fn parent_depth(world: &World, entity: Entity, limit: usize) -> usize {
    let mut depth = 0;
    let mut current = entity;
    while depth < limit {
        let parent = world
            .get::<&OrbitalBody>(current)
            .ok()
            .and_then(|orbit| orbit.parent)
            .and_then(|parent| resolve(world, parent));
        match parent {
            Some(parent) => {
                depth += 1;
                current = parent;
            }
            None => break,
        }
    }
    depth
}
