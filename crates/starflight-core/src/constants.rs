//! Simulation constants and tuning parameters.

use glam::DVec3;

/// Nominal frame rate the runner drives the simulation at (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal frame rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound applied to any supplied delta time (seconds).
pub const MAX_DELTA_TIME: f64 = 0.25;

/// Squared length below which a vector has no usable direction.
pub const MIN_DIRECTION_LENGTH_SQ: f64 = 1e-12;

// --- Ship body axes (local space) ---

pub const SHIP_FORWARD: DVec3 = DVec3::NEG_Z;
pub const SHIP_RIGHT: DVec3 = DVec3::X;
pub const SHIP_UP: DVec3 = DVec3::Y;

// --- Player ship ---

pub const PLAYER_MAX_SPEED: f64 = 250.0;
pub const PLAYER_ACCELERATION: f64 = 150.0;
pub const PLAYER_ROTATION_SPEED: f64 = 2.5;
/// Braking deceleration (units/s²).
pub const PLAYER_DECELERATION: f64 = 300.0;
pub const PLAYER_MAX_HEALTH: f64 = 100.0;
pub const PLAYER_TURBO_MULTIPLIER: f64 = 2.0;
pub const PLAYER_WEAPON_COOLDOWN: f64 = 0.2;
/// Lateral distance of each gun from the hull centre (matches the wing mesh).
pub const PLAYER_WING_OFFSET: f64 = 2.0;
pub const PLAYER_BARREL_OFFSET: f64 = 1.0;
pub const PLAYER_PROJECTILE_SPEED: f64 = 400.0;
pub const PLAYER_PROJECTILE_DAMAGE: f64 = 20.0;
pub const PLAYER_PROJECTILE_COLOR: u32 = 0x00ff00;

// --- Enemy ship ---

pub const ENEMY_MAX_SPEED: f64 = 100.0;
pub const ENEMY_ACCELERATION: f64 = 40.0;
pub const ENEMY_ROTATION_SPEED: f64 = 1.5;
pub const ENEMY_MAX_HEALTH: f64 = 50.0;
pub const ENEMY_WEAPON_COOLDOWN: f64 = 0.5;
pub const ENEMY_WING_OFFSET: f64 = 1.5;
pub const ENEMY_BARREL_OFFSET: f64 = 0.5;
pub const ENEMY_PROJECTILE_SPEED: f64 = 300.0;
pub const ENEMY_PROJECTILE_DAMAGE: f64 = 10.0;
pub const ENEMY_PROJECTILE_COLOR: u32 = 0xff3366;
pub const ENEMY_DETECTION_RANGE: f64 = 500.0;
pub const ENEMY_ATTACK_RANGE: f64 = 200.0;
pub const ENEMY_PATROL_RADIUS: f64 = 100.0;

// --- Shared ship defaults ---

pub const SHIP_MAX_FUEL: f64 = 100.0;
/// Fuel units burned per second while the ship is moving.
pub const SHIP_FUEL_CONSUMPTION: f64 = 0.1;
pub const PROJECTILE_LIFETIME_SECS: f64 = 2.0;

// --- Projectile pool ---

pub const PROJECTILE_POOL_CAPACITY: usize = 40;
pub const PROJECTILE_MAX_TRAVEL_DISTANCE: f64 = 1000.0;
pub const PROJECTILE_COLLISION_RADIUS: f64 = 2.0;

// --- Enemy AI ---

/// Chase → Patrol once distance exceeds detection range times this factor.
pub const AI_CHASE_EXIT_FACTOR: f64 = 1.5;
/// Attack → Chase once distance exceeds attack range times this factor.
pub const AI_ATTACK_EXIT_FACTOR: f64 = 1.2;
/// Distance at which a patrol point counts as reached.
pub const AI_PATROL_ARRIVAL_RADIUS: f64 = 5.0;
/// Preferred standoff as a fraction of attack range.
pub const AI_STANDOFF_FACTOR: f64 = 0.7;
/// Vertical spread of patrol points as a fraction of patrol radius.
pub const AI_PATROL_VERTICAL_FACTOR: f64 = 0.5;

// --- Targeting ---

pub const TARGETING_MAX_DISTANCE: f64 = 5000.0;
pub const TARGETING_HORIZONTAL_DEG: f64 = 10.0;
pub const TARGETING_VERTICAL_DEG: f64 = 20.0;
pub const TARGETING_OVERALL_DEG: f64 = 5.0;

// --- Autopilot ---

pub const AUTOPILOT_CLOSE_DISTANCE: f64 = 150.0;
pub const AUTOPILOT_FOLLOW_DISTANCE: f64 = 200.0;
pub const AUTOPILOT_FOLLOW_MAX_SPEED: f64 = 100.0;
/// Base speed toward the hold position while following.
pub const AUTOPILOT_FOLLOW_CLOSING_SPEED: f64 = 50.0;
/// Exponential blend rate toward the desired follow velocity (1/s).
pub const AUTOPILOT_FOLLOW_BLEND_RATE: f64 = 2.0;
/// Distance under which approach speed starts tapering off.
pub const AUTOPILOT_APPROACH_SLOWDOWN_DISTANCE: f64 = 1000.0;
/// Following phase is held until distance exceeds the hold band times this factor.
pub const AUTOPILOT_FOLLOW_EXIT_FACTOR: f64 = 1.5;

// --- UI ---

pub const STATUS_MESSAGE_SECS: f64 = 3.0;
pub const LOW_FUEL_PERCENT: f64 = 20.0;
/// HUD speed readout conversion.
pub const SPEED_TO_KMH: f64 = 3.6;

// --- Default scenario ---

pub const SCENARIO_DISTANCE_SCALE: f64 = 6000.0;
pub const SCENARIO_SIZE_SCALE: f64 = 60.0;
pub const SCENARIO_ASTEROID_COUNT: usize = 200;
pub const SCENARIO_ENEMY_COUNT: usize = 5;
/// Player spawn offset from Earth on the x and z axes.
pub const SCENARIO_PLAYER_OFFSET: f64 = 150.0;
