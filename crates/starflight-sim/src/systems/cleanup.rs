//! Cleanup system: removes ships destroyed during the tick.

use hecs::{Entity, World};

use starflight_core::components::KinematicBody;

/// Despawn destroyed ships and drop them from the roster.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    roster: &mut Vec<Entity>,
    player: &mut Option<Entity>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    for (entity, body) in world.query_mut::<&KinematicBody>() {
        if body.destroyed {
            despawn_buffer.push(entity);
        }
    }
    if despawn_buffer.is_empty() {
        return;
    }

    roster.retain(|entity| !despawn_buffer.contains(entity));
    if player.is_some_and(|p| despawn_buffer.contains(&p)) {
        *player = None;
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
