//! Snapshot system: queries the world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::{Entity, World};

use starflight_core::components::*;
use starflight_core::constants::{LOW_FUEL_PERCENT, SPEED_TO_KMH};
use starflight_core::enums::EntityKind;
use starflight_core::events::{SimEvent, StatusMessage};
use starflight_core::state::*;
use starflight_core::types::{SimTime, Transform, Velocity};

use crate::engine::{entity_id, resolve};
use crate::projectile_pool::ProjectilePool;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    roster: &[Entity],
    pool: &ProjectilePool,
    player: Option<Entity>,
    time: &SimTime,
    status: Option<&StatusMessage>,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        player: player.map(entity_id),
        ships: build_ships(world, roster),
        bodies: build_bodies(world, roster),
        projectiles: build_projectiles(pool),
        hud: build_hud(world, roster, player, time, status),
        events,
    }
}

fn build_ships(world: &World, roster: &[Entity]) -> Vec<ShipView> {
    roster
        .iter()
        .filter_map(|&entity| {
            let mut query = world
                .query_one::<(
                    &EntityKind,
                    &Transform,
                    &Velocity,
                    &KinematicBody,
                    Option<&AiAgent>,
                )>(entity)
                .ok()?;
            let (kind, transform, velocity, body, agent) = query.get()?;
            Some(ShipView {
                id: entity_id(entity),
                kind: *kind,
                faction: kind.faction(),
                position: transform.position,
                orientation: transform.orientation,
                velocity: velocity.0,
                health: body.health,
                fuel: body.fuel,
                ai_state: agent.map(|a| a.state),
            })
        })
        .collect()
}

fn build_bodies(world: &World, roster: &[Entity]) -> Vec<BodyView> {
    roster
        .iter()
        .filter_map(|&entity| {
            let mut query = world
                .query_one::<(
                    &EntityKind,
                    &Transform,
                    &OrbitalBody,
                    Option<&PlanetInfo>,
                    Option<&StarInfo>,
                )>(entity)
                .ok()?;
            let (kind, transform, orbit, planet, star) = query.get()?;
            let name = planet
                .map(|p| p.name.clone())
                .or_else(|| star.map(|s| s.name.clone()))
                .unwrap_or_default();
            Some(BodyView {
                id: entity_id(entity),
                kind: *kind,
                name,
                position: transform.position,
                radius: orbit.radius,
                self_rotation: orbit.self_rotation,
                is_targeted: planet.is_some_and(|p| p.is_targeted),
            })
        })
        .collect()
}

fn build_projectiles(pool: &ProjectilePool) -> Vec<ProjectileView> {
    pool.iter_active()
        .map(|(handle, p)| ProjectileView {
            handle,
            shooter: p.shooter,
            position: p.position,
            velocity: p.velocity,
            color: p.color,
        })
        .collect()
}

fn build_hud(
    world: &World,
    roster: &[Entity],
    player: Option<Entity>,
    time: &SimTime,
    status: Option<&StatusMessage>,
) -> HudView {
    let status_message = status
        .filter(|s| time.elapsed_secs < s.expires_at)
        .map(|s| s.text.clone());

    let mut hud = HudView {
        status_message,
        ..HudView::default()
    };
    let Some(player) = player else {
        return hud;
    };

    if let Ok(mut query) = world.query_one::<(&Velocity, &KinematicBody)>(player) {
        if let Some((velocity, body)) = query.get() {
            hud.speed = velocity.speed();
            hud.speed_kmh = hud.speed * SPEED_TO_KMH;
            hud.fuel_percent = if body.max_fuel > 0.0 {
                body.fuel / body.max_fuel * 100.0
            } else {
                0.0
            };
            hud.low_fuel = hud.fuel_percent < LOW_FUEL_PERCENT;
            hud.health = body.health;
        }
    }

    let autopilot = world.get::<&Autopilot>(player).ok().map(|a| (*a).clone());
    if let Some(autopilot) = &autopilot {
        hud.autopilot = AutopilotView {
            active: autopilot.active,
            target: autopilot.target,
            phase: autopilot.active.then_some(autopilot.phase),
        };
    }

    // The autopilot's target wins; otherwise the first targeted planet.
    let locked = autopilot
        .filter(|a| a.active)
        .and_then(|a| a.target)
        .and_then(|id| resolve(world, id));
    let shown = locked.or_else(|| {
        roster.iter().copied().find(|&entity| {
            world
                .get::<&PlanetInfo>(entity)
                .map(|info| info.is_targeted)
                .unwrap_or(false)
        })
    });
    hud.targeted_planet = shown.and_then(|entity| planet_details(world, entity));
    hud
}

/// Formatted planet descriptor for the info panel.
pub fn planet_details(world: &World, entity: Entity) -> Option<PlanetDetails> {
    let info = world.get::<&PlanetInfo>(entity).ok()?;
    let orbit = world.get::<&OrbitalBody>(entity).ok()?;
    Some(PlanetDetails {
        name: info.name.clone(),
        class: info.class.label().to_string(),
        size: format!("{} km", orbit.radius.round() as i64),
        distance_from_sun: format!("{} km", group_thousands(info.distance_from_sun.round() as i64)),
        atmosphere: if info.has_atmosphere { "Present" } else { "None" }.to_string(),
        description: info.description.clone(),
    })
}

/// `1234567` -> `"1,234,567"`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
