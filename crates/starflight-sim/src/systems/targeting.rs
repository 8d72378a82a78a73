//! Targeting: which planets sit under the player's reticle.
//!
//! A planet is targeted inside the lenient split-axis cone (horizontal and
//! vertical tolerances checked separately) or inside the tight overall cone.
//! Only transitions produce events.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use starflight_core::components::{KinematicBody, PlanetInfo};
use starflight_core::config::TargetingConfig;
use starflight_core::enums::EntityKind;
use starflight_core::events::SimEvent;
use starflight_core::types::{safe_normalize, Transform};

use crate::engine::entity_id;

pub fn run(
    world: &mut World,
    roster: &[Entity],
    player: Option<Entity>,
    config: &TargetingConfig,
    events: &mut Vec<SimEvent>,
) {
    let viewer = player.and_then(|p| {
        let destroyed = world.get::<&KinematicBody>(p).map(|b| b.destroyed).unwrap_or(true);
        if destroyed {
            return None;
        }
        world.get::<&Transform>(p).ok().map(|t| *t)
    });

    for &entity in roster {
        let Ok((kind, transform, info)) =
            world.query_one_mut::<(&EntityKind, &Transform, &mut PlanetInfo)>(entity)
        else {
            continue;
        };
        if *kind != EntityKind::Planet {
            continue;
        }

        let targeted = viewer
            .as_ref()
            .is_some_and(|v| in_targeting_cone(v, transform.position, config));
        let id = entity_id(entity);
        if targeted && !info.is_targeted {
            info.is_targeted = true;
            debug!(%id, name = %info.name, "planet targeted");
            events.push(SimEvent::BodyTargeted {
                id,
                name: info.name.clone(),
            });
        } else if !targeted && info.is_targeted {
            info.is_targeted = false;
            debug!(%id, name = %info.name, "planet untargeted");
            events.push(SimEvent::BodyUntargeted { id });
        }
    }
}

/// Whether `target` lies inside the viewer's targeting cone.
pub fn in_targeting_cone(viewer: &Transform, target: DVec3, config: &TargetingConfig) -> bool {
    let offset = target - viewer.position;
    if offset.length() > config.max_distance {
        return false;
    }
    let Some(direction) = safe_normalize(offset) else {
        return false;
    };
    let forward = viewer.forward();

    if forward.angle_between(direction) < config.overall_threshold() {
        return true;
    }

    let flat = |v: DVec3| safe_normalize(DVec3::new(v.x, 0.0, v.z));
    let (Some(forward_flat), Some(direction_flat)) = (flat(forward), flat(direction)) else {
        return false;
    };
    let horizontal = forward_flat.angle_between(direction_flat);
    let vertical = (elevation(forward) - elevation(direction)).abs();

    horizontal < config.horizontal_threshold() && vertical < config.vertical_threshold()
}

fn elevation(unit: DVec3) -> f64 {
    unit.y.clamp(-1.0, 1.0).asin()
}
