//! Events emitted by the simulation for rendering, audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, ProjectileHandle};

/// Discrete simulation event. Drained into each tick's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
    },
    EntityDestroyed {
        id: EntityId,
        kind: EntityKind,
    },
    ProjectileActivated {
        handle: ProjectileHandle,
        shooter: EntityId,
    },
    ProjectileDeactivated {
        handle: ProjectileHandle,
        reason: DeactivationReason,
    },
    ShipDamaged {
        id: EntityId,
        amount: f64,
        remaining: f64,
    },
    /// A weapon cycled; `projectiles` is how many spawns the pool accepted.
    WeaponFired {
        shooter: EntityId,
        projectiles: u32,
    },
    AiStateChanged {
        id: EntityId,
        from: AiState,
        to: AiState,
    },
    BodyTargeted {
        id: EntityId,
        name: String,
    },
    BodyUntargeted {
        id: EntityId,
    },
    AutopilotEngaged {
        target: EntityId,
        name: String,
    },
    AutopilotDisengaged {
        reason: DisengageReason,
    },
    /// Toggle pressed with nothing targeted.
    AutopilotUnavailable,
}

/// Short-lived banner text for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    /// Simulation time after which the message is no longer shown.
    pub expires_at: f64,
}
