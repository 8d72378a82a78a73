//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Loaded once at startup; the engine never re-reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::ProjectileSpec;
use crate::constants::*;
use crate::enums::ProjectileLeash;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same input = same simulation.
    pub seed: u64,
    /// Largest delta time a single tick will integrate.
    pub max_delta_time: f64,
    /// How long autopilot banners stay visible.
    pub status_message_secs: f64,
    pub projectiles: ProjectilePoolConfig,
    pub targeting: TargetingConfig,
    pub autopilot: AutopilotConfig,
    #[serde(default = "ShipProfile::player")]
    pub player_ship: ShipProfile,
    #[serde(default = "ShipProfile::enemy")]
    pub enemy_ship: ShipProfile,
    pub enemy_ai: AiTuning,
    pub scenario: ScenarioConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_delta_time: MAX_DELTA_TIME,
            status_message_secs: STATUS_MESSAGE_SECS,
            projectiles: ProjectilePoolConfig::default(),
            targeting: TargetingConfig::default(),
            autopilot: AutopilotConfig::default(),
            player_ship: ShipProfile::player(),
            enemy_ship: ShipProfile::enemy(),
            enemy_ai: AiTuning::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

/// Per-ship checks. Field names are built at compile time so errors can
/// name the exact key.
macro_rules! validate_ship {
    ($ship:expr, $prefix:literal) => {{
        let ship = &$ship;
        positive(concat!($prefix, ".max_speed"), ship.max_speed)?;
        positive(concat!($prefix, ".acceleration"), ship.acceleration)?;
        positive(concat!($prefix, ".rotation_speed"), ship.rotation_speed)?;
        non_negative(concat!($prefix, ".deceleration"), ship.deceleration)?;
        positive(concat!($prefix, ".max_health"), ship.max_health)?;
        positive(concat!($prefix, ".max_fuel"), ship.max_fuel)?;
        non_negative(concat!($prefix, ".fuel_consumption"), ship.fuel_consumption)?;
        at_least(concat!($prefix, ".turbo_multiplier"), ship.turbo_multiplier, 1.0)?;

        let weapon = &ship.weapon;
        non_negative(concat!($prefix, ".weapon.cooldown_secs"), weapon.cooldown_secs)?;
        non_negative(concat!($prefix, ".weapon.wing_offset"), weapon.wing_offset)?;
        non_negative(concat!($prefix, ".weapon.barrel_offset"), weapon.barrel_offset)?;
        positive(concat!($prefix, ".weapon.projectile.speed"), weapon.projectile.speed)?;
        non_negative(concat!($prefix, ".weapon.projectile.damage"), weapon.projectile.damage)?;
        positive(
            concat!($prefix, ".weapon.projectile.lifetime_secs"),
            weapon.projectile.lifetime_secs,
        )?;
    }};
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_delta_time", self.max_delta_time)?;
        non_negative("status_message_secs", self.status_message_secs)?;

        if self.projectiles.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "projectiles.capacity",
                reason: "must be at least 1".into(),
            });
        }
        let projectiles = &self.projectiles;
        positive("projectiles.max_travel_distance", projectiles.max_travel_distance)?;
        positive("projectiles.collision_radius", projectiles.collision_radius)?;

        let targeting = &self.targeting;
        positive("targeting.max_distance", targeting.max_distance)?;
        positive("targeting.horizontal_threshold_deg", targeting.horizontal_threshold_deg)?;
        positive("targeting.vertical_threshold_deg", targeting.vertical_threshold_deg)?;
        positive("targeting.overall_threshold_deg", targeting.overall_threshold_deg)?;

        let autopilot = &self.autopilot;
        non_negative("autopilot.close_distance", autopilot.close_distance)?;
        non_negative("autopilot.follow_distance", autopilot.follow_distance)?;
        positive("autopilot.follow_max_speed", autopilot.follow_max_speed)?;
        positive("autopilot.follow_closing_speed", autopilot.follow_closing_speed)?;
        positive("autopilot.follow_blend_rate", autopilot.follow_blend_rate)?;
        positive("autopilot.approach_slowdown_distance", autopilot.approach_slowdown_distance)?;
        // The exit band must enclose the hold distance.
        at_least("autopilot.follow_exit_factor", autopilot.follow_exit_factor, 1.0)?;

        validate_ship!(self.player_ship, "player_ship");
        validate_ship!(self.enemy_ship, "enemy_ship");

        let ai = &self.enemy_ai;
        positive("enemy_ai.detection_range", ai.detection_range)?;
        positive("enemy_ai.attack_range", ai.attack_range)?;
        positive("enemy_ai.patrol_radius", ai.patrol_radius)?;
        if ai.attack_range > ai.detection_range {
            return Err(ConfigError::Invalid {
                field: "enemy_ai.attack_range",
                reason: "must not exceed detection_range".into(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be zero or positive, got {value}"),
        })
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be at least {min}, got {value}"),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilePoolConfig {
    /// Hard cap on pooled projectiles, active or not.
    pub capacity: usize,
    pub max_travel_distance: f64,
    pub collision_radius: f64,
    pub leash: ProjectileLeash,
}

impl Default for ProjectilePoolConfig {
    fn default() -> Self {
        Self {
            capacity: PROJECTILE_POOL_CAPACITY,
            max_travel_distance: PROJECTILE_MAX_TRAVEL_DISTANCE,
            collision_radius: PROJECTILE_COLLISION_RADIUS,
            leash: ProjectileLeash::default(),
        }
    }
}

/// Targeting cone. Horizontal and vertical tolerances are deliberately
/// different; the tight overall cone is an alternative, not a bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    pub max_distance: f64,
    pub horizontal_threshold_deg: f64,
    pub vertical_threshold_deg: f64,
    pub overall_threshold_deg: f64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            max_distance: TARGETING_MAX_DISTANCE,
            horizontal_threshold_deg: TARGETING_HORIZONTAL_DEG,
            vertical_threshold_deg: TARGETING_VERTICAL_DEG,
            overall_threshold_deg: TARGETING_OVERALL_DEG,
        }
    }
}

impl TargetingConfig {
    pub fn horizontal_threshold(&self) -> f64 {
        self.horizontal_threshold_deg.to_radians()
    }

    pub fn vertical_threshold(&self) -> f64 {
        self.vertical_threshold_deg.to_radians()
    }

    pub fn overall_threshold(&self) -> f64 {
        self.overall_threshold_deg.to_radians()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub close_distance: f64,
    pub follow_distance: f64,
    pub follow_max_speed: f64,
    pub follow_closing_speed: f64,
    pub follow_blend_rate: f64,
    pub approach_slowdown_distance: f64,
    pub follow_exit_factor: f64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            close_distance: AUTOPILOT_CLOSE_DISTANCE,
            follow_distance: AUTOPILOT_FOLLOW_DISTANCE,
            follow_max_speed: AUTOPILOT_FOLLOW_MAX_SPEED,
            follow_closing_speed: AUTOPILOT_FOLLOW_CLOSING_SPEED,
            follow_blend_rate: AUTOPILOT_FOLLOW_BLEND_RATE,
            approach_slowdown_distance: AUTOPILOT_APPROACH_SLOWDOWN_DISTANCE,
            follow_exit_factor: AUTOPILOT_FOLLOW_EXIT_FACTOR,
        }
    }
}

/// Flight and combat stats for one ship class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipProfile {
    pub max_speed: f64,
    pub acceleration: f64,
    pub rotation_speed: f64,
    pub deceleration: f64,
    pub max_health: f64,
    pub max_fuel: f64,
    pub fuel_consumption: f64,
    pub turbo_multiplier: f64,
    pub weapon: WeaponProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub cooldown_secs: f64,
    pub wing_offset: f64,
    pub barrel_offset: f64,
    pub projectile: ProjectileSpec,
}

impl ShipProfile {
    pub fn player() -> Self {
        Self {
            max_speed: PLAYER_MAX_SPEED,
            acceleration: PLAYER_ACCELERATION,
            rotation_speed: PLAYER_ROTATION_SPEED,
            deceleration: PLAYER_DECELERATION,
            max_health: PLAYER_MAX_HEALTH,
            max_fuel: SHIP_MAX_FUEL,
            fuel_consumption: SHIP_FUEL_CONSUMPTION,
            turbo_multiplier: PLAYER_TURBO_MULTIPLIER,
            weapon: WeaponProfile {
                cooldown_secs: PLAYER_WEAPON_COOLDOWN,
                wing_offset: PLAYER_WING_OFFSET,
                barrel_offset: PLAYER_BARREL_OFFSET,
                projectile: ProjectileSpec {
                    speed: PLAYER_PROJECTILE_SPEED,
                    damage: PLAYER_PROJECTILE_DAMAGE,
                    lifetime_secs: PROJECTILE_LIFETIME_SECS,
                    color: PLAYER_PROJECTILE_COLOR,
                },
            },
        }
    }

    /// Enemies have no brakes or turbo.
    pub fn enemy() -> Self {
        Self {
            max_speed: ENEMY_MAX_SPEED,
            acceleration: ENEMY_ACCELERATION,
            rotation_speed: ENEMY_ROTATION_SPEED,
            deceleration: 0.0,
            max_health: ENEMY_MAX_HEALTH,
            max_fuel: SHIP_MAX_FUEL,
            fuel_consumption: SHIP_FUEL_CONSUMPTION,
            turbo_multiplier: 1.0,
            weapon: WeaponProfile {
                cooldown_secs: ENEMY_WEAPON_COOLDOWN,
                wing_offset: ENEMY_WING_OFFSET,
                barrel_offset: ENEMY_BARREL_OFFSET,
                projectile: ProjectileSpec {
                    speed: ENEMY_PROJECTILE_SPEED,
                    damage: ENEMY_PROJECTILE_DAMAGE,
                    lifetime_secs: PROJECTILE_LIFETIME_SECS,
                    color: ENEMY_PROJECTILE_COLOR,
                },
            },
        }
    }
}

/// Sensor and patrol ranges for AI-driven ships.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub detection_range: f64,
    pub attack_range: f64,
    pub patrol_radius: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            detection_range: ENEMY_DETECTION_RANGE,
            attack_range: ENEMY_ATTACK_RANGE,
            patrol_radius: ENEMY_PATROL_RADIUS,
        }
    }
}

/// Knobs for the built-in world setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub asteroid_count: usize,
    pub enemy_count: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            asteroid_count: SCENARIO_ASTEROID_COUNT,
            enemy_count: SCENARIO_ENEMY_COUNT,
        }
    }
}
