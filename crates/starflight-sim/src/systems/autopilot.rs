//! Autopilot: engage, disengage and per-tick steering toward a planet.
//!
//! Two phases. Approaching closes in at a speed that tapers with distance;
//! Following holds a fixed stand-off while matching the target's orbital
//! velocity. The Following phase is left only beyond a wider exit band.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use starflight_core::components::{Autopilot, OrbitalBody, PlanetInfo};
use starflight_core::config::AutopilotConfig;
use starflight_core::enums::{AutopilotPhase, DisengageReason, EntityKind};
use starflight_core::events::SimEvent;
use starflight_core::types::{safe_normalize, EntityId, Transform};

use crate::capabilities::{Movable, Orbiting};
use crate::engine::{entity_id, resolve};

/// What the autopilot needs to know about its target this tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    pub position: DVec3,
    pub radius: f64,
    /// World-frame orbital velocity, including every parent the body is
    /// carried along with. Zero for stationary bodies.
    pub orbit_velocity: DVec3,
}

/// Resolve a target handle. `None` once the body no longer exists.
pub fn target_state(world: &World, target: EntityId) -> Option<TargetState> {
    let entity = resolve(world, target)?;
    let position = world.get::<&Transform>(entity).ok()?.position;
    let orbit = world.get::<&OrbitalBody>(entity).ok()?;
    Some(TargetState {
        position,
        radius: orbit.radius,
        orbit_velocity: orbit.tangential_velocity(position) + carried_velocity(world, &orbit),
    })
}

/// Sum of the ancestors' orbital velocities. Bounded so a parent cycle
/// cannot loop forever.
fn carried_velocity(world: &World, orbit: &OrbitalBody) -> DVec3 {
    let mut velocity = DVec3::ZERO;
    let mut next = orbit.parent;
    for _ in 0..world.len() {
        let Some(parent) = next.and_then(|id| resolve(world, id)) else {
            break;
        };
        let (Ok(transform), Ok(parent_orbit)) = (
            world.get::<&Transform>(parent),
            world.get::<&OrbitalBody>(parent),
        ) else {
            break;
        };
        velocity += parent_orbit.tangential_velocity(transform.position);
        next = parent_orbit.parent;
    }
    velocity
}

/// Toggle from the pilot: disengage if active, otherwise lock onto the
/// first targeted planet in registration order.
pub fn toggle(
    world: &mut World,
    roster: &[Entity],
    player: Entity,
    events: &mut Vec<SimEvent>,
) {
    let active = world
        .get::<&Autopilot>(player)
        .map(|a| a.active)
        .unwrap_or(false);
    if active {
        disengage(world, player, DisengageReason::Toggled, events);
        return;
    }

    let targeted = roster.iter().find_map(|&entity| {
        let kind = *world.get::<&EntityKind>(entity).ok()?;
        let info = world.get::<&PlanetInfo>(entity).ok()?;
        (kind == EntityKind::Planet && info.is_targeted).then(|| (entity, info.name.clone()))
    });

    match targeted {
        Some((target, name)) => engage(world, player, target, name, events),
        None => {
            debug!("autopilot toggle with no planet targeted");
            events.push(SimEvent::AutopilotUnavailable);
        }
    }
}

fn engage(
    world: &mut World,
    player: Entity,
    target: Entity,
    name: String,
    events: &mut Vec<SimEvent>,
) {
    let Ok(mut autopilot) = world.get::<&mut Autopilot>(player) else {
        return;
    };
    let target = entity_id(target);
    autopilot.active = true;
    autopilot.target = Some(target);
    autopilot.phase = AutopilotPhase::Approaching;
    info!(%target, %name, "autopilot engaged");
    events.push(SimEvent::AutopilotEngaged { target, name });
}

/// Release the target. No-op (and no event) when already inactive.
pub fn disengage(
    world: &mut World,
    player: Entity,
    reason: DisengageReason,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok(mut autopilot) = world.get::<&mut Autopilot>(player) else {
        return false;
    };
    if !autopilot.active {
        return false;
    }
    autopilot.active = false;
    autopilot.target = None;
    autopilot.phase = AutopilotPhase::Approaching;
    info!(?reason, "autopilot disengaged");
    events.push(SimEvent::AutopilotDisengaged { reason });
    true
}

/// Drop the autopilot if its target is gone or no longer under the reticle.
pub fn release_if_untargeted(
    world: &mut World,
    player: Option<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let Some(player) = player else {
        return;
    };
    let target = match world.get::<&Autopilot>(player) {
        Ok(autopilot) if autopilot.active => autopilot.target,
        _ => return,
    };
    let still_targeted = target
        .and_then(|id| resolve(world, id))
        .and_then(|entity| world.get::<&PlanetInfo>(entity).ok().map(|info| info.is_targeted))
        .unwrap_or(false);
    if !still_targeted {
        disengage(world, player, DisengageReason::TargetLost, events);
    }
}

/// Steer the ship for one tick. Always faces the target. Without fuel the
/// ship only turns and coasts. Returns the new phase when it changed.
pub fn drive<M: Movable>(
    ship: &mut M,
    autopilot: &mut Autopilot,
    target: &TargetState,
    config: &AutopilotConfig,
    dt: f64,
) -> Option<AutopilotPhase> {
    let position = ship.transform().position;
    let offset = target.position - position;
    let distance = offset.length();
    ship.face(offset);

    let close_band = autopilot.close_distance + target.radius;
    let exit_band = (autopilot.close_distance.max(autopilot.follow_distance) + target.radius)
        * config.follow_exit_factor;
    let next = match autopilot.phase {
        AutopilotPhase::Approaching if distance <= close_band => AutopilotPhase::Following,
        AutopilotPhase::Following if distance > exit_band => AutopilotPhase::Approaching,
        phase => phase,
    };
    let changed = next != autopilot.phase;
    autopilot.phase = next;

    if ship.has_fuel() {
        match next {
            AutopilotPhase::Approaching => approach(ship, offset, distance, config, dt),
            AutopilotPhase::Following => follow(ship, autopilot, target, config, dt),
        }
    }
    changed.then_some(next)
}

fn approach<M: Movable>(
    ship: &mut M,
    offset: DVec3,
    distance: f64,
    config: &AutopilotConfig,
    dt: f64,
) {
    ship.thrust(offset, dt);
    let taper = (distance / config.approach_slowdown_distance).min(1.0);
    let cap = ship.speed_cap() * (0.5 + 0.5 * taper);
    let velocity = ship.velocity();
    let speed = velocity.length();
    if speed > cap {
        ship.set_velocity(velocity * (cap / speed));
    }
}

fn follow<M: Movable>(
    ship: &mut M,
    autopilot: &Autopilot,
    target: &TargetState,
    config: &AutopilotConfig,
    dt: f64,
) {
    let position = ship.transform().position;
    let hold_distance = autopilot.follow_distance + target.radius;
    let toward_hold = safe_normalize(position - target.position)
        .and_then(|away| safe_normalize(target.position + away * hold_distance - position));

    let desired = toward_hold.map_or(DVec3::ZERO, |dir| dir * config.follow_closing_speed)
        + target.orbit_velocity;
    let blend = (config.follow_blend_rate * dt).min(1.0);
    let mut velocity = ship.velocity() + (desired - ship.velocity()) * blend;
    let speed = velocity.length();
    if speed > config.follow_max_speed {
        velocity *= config.follow_max_speed / speed;
    }
    ship.set_velocity(velocity);
}
