//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Concrete kind of a simulated entity. Systems dispatch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    PlayerShip,
    EnemyShip,
    Planet,
    Star,
    Projectile,
}

impl EntityKind {
    /// Side this kind fights for. Celestial bodies and projectiles have none.
    pub fn faction(self) -> Option<Faction> {
        match self {
            EntityKind::PlayerShip => Some(Faction::Player),
            EntityKind::EnemyShip => Some(Faction::Hostile),
            EntityKind::Planet | EntityKind::Star | EntityKind::Projectile => None,
        }
    }

    pub fn is_ship(self) -> bool {
        matches!(self, EntityKind::PlayerShip | EntityKind::EnemyShip)
    }
}

/// Side used to exclude friendly-fire collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
}

/// Enemy AI behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Wandering between random points near the current position.
    #[default]
    Patrol,
    /// Flying straight at the player.
    Chase,
    /// Holding standoff range and firing.
    Attack,
}

/// Planet surface class, used for descriptions and UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetClass {
    #[default]
    Rocky,
    Gas,
    Ice,
}

impl PlanetClass {
    /// Capitalised label shown in the planet info panel.
    pub fn label(self) -> &'static str {
        match self {
            PlanetClass::Rocky => "Rocky",
            PlanetClass::Gas => "Gas",
            PlanetClass::Ice => "Ice",
        }
    }
}

/// Autopilot navigation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutopilotPhase {
    /// Closing in on the target at a distance-tapered speed.
    #[default]
    Approaching,
    /// Holding a fixed stand-off from the target, matching its orbit.
    Following,
}

/// Why a projectile returned to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeactivationReason {
    Expired,
    OutOfRange,
    Hit,
}

/// Why the autopilot let go of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisengageReason {
    /// Explicit toggle from the pilot.
    Toggled,
    /// Target left the targeting cone or no longer exists.
    TargetLost,
}

/// Reference point for a projectile's maximum travel distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileLeash {
    /// Measured against the shooter's live position.
    #[default]
    Shooter,
    /// Measured against the muzzle point the projectile left from.
    SpawnPoint,
}
