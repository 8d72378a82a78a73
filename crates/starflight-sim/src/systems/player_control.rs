//! Player control: manual flight from the input snapshot, or the autopilot.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use starflight_core::components::{Autopilot, KinematicBody, PlayerControl, Weapon};
use starflight_core::config::AutopilotConfig;
use starflight_core::enums::{DisengageReason, EntityKind};
use starflight_core::events::SimEvent;
use starflight_core::input::InputSnapshot;
use starflight_core::types::{Transform, Velocity};

use crate::capabilities::{Movable, ShipBody};
use crate::engine::entity_id;
use crate::projectile_pool::{ProjectilePool, Shooter};
use crate::systems::autopilot::{self, TargetState};
use crate::systems::combat;

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    roster: &[Entity],
    player: Option<Entity>,
    input: &InputSnapshot,
    config: &AutopilotConfig,
    pool: &mut ProjectilePool,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let Some(player) = player else {
        return;
    };
    let alive = world
        .get::<&KinematicBody>(player)
        .map(|b| !b.destroyed)
        .unwrap_or(false);
    if !alive {
        return;
    }

    if input.toggle_autopilot {
        autopilot::toggle(world, roster, player, events);
    }
    let target = resolve_autopilot_target(world, player, events);

    let Ok((kind, transform, velocity, body, weapon, control, pilot)) = world.query_one_mut::<(
        &EntityKind,
        &mut Transform,
        &mut Velocity,
        &mut KinematicBody,
        &mut Weapon,
        &mut PlayerControl,
        &mut Autopilot,
    )>(player) else {
        return;
    };

    let mut ship = ShipBody::new(transform, velocity, body);
    match target {
        Some(target) => {
            control.turbo_active = false;
            control.braking = false;
            ship.body.speed_multiplier = 1.0;
            if let Some(phase) = autopilot::drive(&mut ship, pilot, &target, config, dt) {
                debug!(?phase, "autopilot phase change");
            }
        }
        None => manual(&mut ship, control, input, dt),
    }

    if input.fire {
        let shooter = Shooter {
            id: entity_id(player),
            faction: kind.faction(),
            position: ship.transform().position,
        };
        combat::fire(pool, shooter, ship.transform(), weapon, now, events);
    }
}

/// Target of an active autopilot, disengaging if it no longer exists.
fn resolve_autopilot_target(
    world: &mut World,
    player: Entity,
    events: &mut Vec<SimEvent>,
) -> Option<TargetState> {
    let target = match world.get::<&Autopilot>(player) {
        Ok(pilot) if pilot.active => pilot.target,
        _ => return None,
    };
    let state = target.and_then(|id| autopilot::target_state(world, id));
    if state.is_none() {
        autopilot::disengage(world, player, DisengageReason::TargetLost, events);
    }
    state
}

fn manual(ship: &mut ShipBody<'_>, control: &mut PlayerControl, input: &InputSnapshot, dt: f64) {
    control.turbo_active = input.turbo;
    control.braking = input.brake;
    ship.body.speed_multiplier = if input.turbo {
        control.turbo_multiplier
    } else {
        1.0
    };

    if input.brake {
        ship.brake(dt);
    }
    for (held, axis) in turn_inputs(input) {
        if held {
            ship.rotate_local(axis, dt);
        }
    }

    let mut local_z = 0.0;
    if input.forward {
        local_z -= 1.0;
    }
    if input.backward {
        local_z += 1.0;
    }
    if local_z != 0.0 {
        let direction = ship.transform().orientation * DVec3::new(0.0, 0.0, local_z);
        ship.thrust(direction, dt);
    }
}

/// Turn controls in application order, with the local axis each rotates about.
fn turn_inputs(input: &InputSnapshot) -> [(bool, DVec3); 6] {
    [
        (input.yaw_left, DVec3::Y),
        (input.yaw_right, DVec3::NEG_Y),
        (input.pitch_up, DVec3::X),
        (input.pitch_down, DVec3::NEG_X),
        (input.roll_left, DVec3::Z),
        (input.roll_right, DVec3::NEG_Z),
    ]
}
