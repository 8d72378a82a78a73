//! Simulation snapshot: the complete visible state handed to the renderer
//! and UI after each tick. Nothing in here is ever written back.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, ProjectileHandle, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub player: Option<EntityId>,
    pub ships: Vec<ShipView>,
    pub bodies: Vec<BodyView>,
    pub projectiles: Vec<ProjectileView>,
    pub hud: HudView,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub faction: Option<Faction>,
    pub position: DVec3,
    pub orientation: DQuat,
    pub velocity: DVec3,
    pub health: f64,
    pub fuel: f64,
    /// Present for AI-driven ships.
    pub ai_state: Option<AiState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub position: DVec3,
    pub radius: f64,
    /// Spin angle about the body's own axis.
    pub self_rotation: f64,
    pub is_targeted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub handle: ProjectileHandle,
    pub shooter: EntityId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub color: u32,
}

/// Formatted planet descriptor for the info panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetDetails {
    pub name: String,
    pub class: String,
    pub size: String,
    pub distance_from_sun: String,
    pub atmosphere: String,
    pub description: String,
}

/// Autopilot status for the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutopilotView {
    pub active: bool,
    pub target: Option<EntityId>,
    pub phase: Option<AutopilotPhase>,
}

/// Per-tick HUD readout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    /// Player speed in simulation units per second.
    pub speed: f64,
    pub speed_kmh: f64,
    pub fuel_percent: f64,
    pub low_fuel: bool,
    pub health: f64,
    pub targeted_planet: Option<PlanetDetails>,
    pub autopilot: AutopilotView,
    /// Most recent autopilot banner, while still live.
    pub status_message: Option<String>,
}
