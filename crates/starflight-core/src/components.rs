//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Thrust, speed cap, health and fuel for anything that flies under power.
///
/// Invariants held by the movement systems: `0 <= health <= max_health`,
/// `0 <= fuel <= max_fuel`, and speed never above `max_speed * speed_multiplier`
/// after integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    pub max_speed: f64,
    /// Thrust acceleration (units/s²).
    pub acceleration: f64,
    /// Turn gain (rad/s).
    pub rotation_speed: f64,
    /// Braking deceleration (units/s²).
    pub deceleration: f64,
    pub health: f64,
    pub max_health: f64,
    pub fuel: f64,
    pub max_fuel: f64,
    /// Fuel burned per second while moving.
    pub fuel_consumption: f64,
    /// Temporary scale on acceleration and speed cap (turbo).
    pub speed_multiplier: f64,
    /// Set once when health first reaches zero.
    pub destroyed: bool,
}

/// Parameters for projectiles a weapon spawns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f64,
    pub damage: f64,
    pub lifetime_secs: f64,
    /// RGB tint for the renderer.
    pub color: u32,
}

/// Twin wing-mounted guns sharing a cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub cooldown_secs: f64,
    /// Simulation time of the last successful shot.
    pub last_fire_time: Option<f64>,
    /// Lateral offset of each muzzle from the hull centre.
    pub wing_offset: f64,
    /// Forward offset of the muzzles.
    pub barrel_offset: f64,
    pub projectile: ProjectileSpec,
}

/// Spin and circular orbit for stars, planets and moons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalBody {
    pub radius: f64,
    /// Spin about the body's own axis (rad/s). Visual only.
    pub self_rotation_speed: f64,
    /// Accumulated spin angle in `[0, TAU)`.
    pub self_rotation: f64,
    /// Angular speed about `orbit_center` (rad/s). Zero means stationary.
    pub orbit_speed: f64,
    pub orbit_distance: f64,
    pub orbit_center: DVec3,
    /// Body whose live position is the orbit centre (moons).
    pub parent: Option<EntityId>,
}

/// Descriptive planet data consumed by the UI, plus targeting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetInfo {
    pub name: String,
    pub class: PlanetClass,
    pub has_atmosphere: bool,
    pub has_rings: bool,
    pub distance_from_sun: f64,
    pub description: String,
    pub is_targeted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarInfo {
    pub name: String,
    pub color: u32,
    pub intensity: f64,
}

/// Enemy AI state machine data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAgent {
    pub state: AiState,
    pub detection_range: f64,
    pub attack_range: f64,
    pub patrol_point: Option<DVec3>,
    pub patrol_radius: f64,
    /// Simulation time of the last state transition.
    pub last_state_change: f64,
}

/// Player-only control state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerControl {
    pub turbo_multiplier: f64,
    pub turbo_active: bool,
    pub braking: bool,
}

/// Autopilot slaved to a targeted planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autopilot {
    pub active: bool,
    /// Weak reference; re-resolved every tick.
    pub target: Option<EntityId>,
    pub phase: AutopilotPhase,
    pub close_distance: f64,
    pub follow_distance: f64,
}
