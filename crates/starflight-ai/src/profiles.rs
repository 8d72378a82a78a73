//! Ship-class behavioral profiles.
//!
//! Consolidates the hysteresis and patrol parameters for the enemy FSM.
//! Ranges themselves live on each agent; these are the shape factors.

use starflight_core::enums::EntityKind;

/// Behavioral profile for an AI-driven ship class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile {
    /// Chase gives up once distance exceeds `detection_range` times this.
    pub chase_exit_factor: f64,
    /// Attack falls back to Chase once distance exceeds `attack_range` times this.
    pub attack_exit_factor: f64,
    /// Distance at which the current patrol point counts as reached.
    pub patrol_arrival_radius: f64,
    /// Preferred combat range as a fraction of `attack_range`.
    pub standoff_factor: f64,
    /// Vertical spread of patrol points as a fraction of `patrol_radius`.
    pub patrol_vertical_factor: f64,
}

impl BehaviorProfile {
    pub fn hostile() -> Self {
        use starflight_core::constants::*;

        Self {
            chase_exit_factor: AI_CHASE_EXIT_FACTOR,
            attack_exit_factor: AI_ATTACK_EXIT_FACTOR,
            patrol_arrival_radius: AI_PATROL_ARRIVAL_RADIUS,
            standoff_factor: AI_STANDOFF_FACTOR,
            patrol_vertical_factor: AI_PATROL_VERTICAL_FACTOR,
        }
    }
}

/// Get the behavioral profile for an entity kind. Only AI-driven kinds have one.
pub fn get_profile(kind: EntityKind) -> Option<BehaviorProfile> {
    match kind {
        EntityKind::EnemyShip => Some(BehaviorProfile::hostile()),
        EntityKind::PlayerShip | EntityKind::Planet | EntityKind::Star | EntityKind::Projectile => {
            None
        }
    }
}
