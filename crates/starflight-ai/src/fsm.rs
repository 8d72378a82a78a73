//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and steering intent for
//! one agent from its situation. No ECS dependency; operates on plain data.
//! The caller turns the returned intent into rotation, thrust and fire.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;
use starflight_core::enums::AiState;
use starflight_core::types::safe_normalize;

use crate::profiles::BehaviorProfile;

/// Input to the FSM for a single agent.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub state: AiState,
    pub position: DVec3,
    /// Live player position, `None` when there is no player to hunt.
    pub player_position: Option<DVec3>,
    pub detection_range: f64,
    pub attack_range: f64,
    pub patrol_point: Option<DVec3>,
    pub patrol_radius: f64,
}

impl AgentContext {
    /// Straight-line distance to the player; infinite without one.
    pub fn distance_to_player(&self) -> f64 {
        self.player_position
            .map(|p| self.position.distance(p))
            .unwrap_or(f64::INFINITY)
    }
}

/// Output from the FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentUpdate {
    pub new_state: AiState,
    pub state_changed: bool,
    /// Unit world direction to turn toward and thrust along.
    pub steer: Option<DVec3>,
    pub fire: bool,
    /// Patrol point to keep for the next tick.
    pub patrol_point: Option<DVec3>,
}

/// Evaluate the FSM for one agent.
///
/// The agent acts on the state it entered the tick with, then transitions.
pub fn evaluate<R: Rng + ?Sized>(
    ctx: &AgentContext,
    profile: &BehaviorProfile,
    rng: &mut R,
) -> AgentUpdate {
    let distance = ctx.distance_to_player();

    let (steer, fire, patrol_point) = match ctx.state {
        AiState::Patrol => {
            let point = patrol_target(ctx, profile, rng);
            (safe_normalize(point - ctx.position), false, Some(point))
        }
        AiState::Chase => (chase_direction(ctx), false, ctx.patrol_point),
        AiState::Attack => {
            let (steer, fire) = attack_behavior(ctx, profile, distance);
            (steer, fire, ctx.patrol_point)
        }
    };

    let new_state = next_state(ctx.state, distance, ctx, profile);

    AgentUpdate {
        new_state,
        state_changed: new_state != ctx.state,
        steer,
        fire,
        patrol_point,
    }
}

/// Transition guards. Exit thresholds are wider than entry thresholds so an
/// agent sitting on a boundary does not flap.
pub fn next_state(
    state: AiState,
    distance: f64,
    ctx: &AgentContext,
    profile: &BehaviorProfile,
) -> AiState {
    match state {
        AiState::Patrol if distance < ctx.detection_range => AiState::Chase,
        AiState::Chase if distance < ctx.attack_range => AiState::Attack,
        AiState::Chase if distance > ctx.detection_range * profile.chase_exit_factor => {
            AiState::Patrol
        }
        AiState::Attack if distance > ctx.attack_range * profile.attack_exit_factor => {
            AiState::Chase
        }
        _ => state,
    }
}

/// Keep the current patrol point until it is reached, then draw a new one.
fn patrol_target<R: Rng + ?Sized>(
    ctx: &AgentContext,
    profile: &BehaviorProfile,
    rng: &mut R,
) -> DVec3 {
    match ctx.patrol_point {
        Some(point) if ctx.position.distance(point) >= profile.patrol_arrival_radius => point,
        _ => random_patrol_point(
            ctx.position,
            ctx.patrol_radius,
            profile.patrol_vertical_factor,
            rng,
        ),
    }
}

/// Random point within `radius` of `center` horizontally, with a vertical
/// offset of at most `radius * vertical_factor` either way.
pub fn random_patrol_point<R: Rng + ?Sized>(
    center: DVec3,
    radius: f64,
    vertical_factor: f64,
    rng: &mut R,
) -> DVec3 {
    let azimuth = rng.gen::<f64>() * TAU;
    let distance = rng.gen::<f64>() * radius;
    let lift = (rng.gen::<f64>() * 2.0 - 1.0) * radius * vertical_factor;
    center + DVec3::new(azimuth.cos() * distance, lift, azimuth.sin() * distance)
}

fn chase_direction(ctx: &AgentContext) -> Option<DVec3> {
    ctx.player_position
        .and_then(|player| safe_normalize(player - ctx.position))
}

/// Hold the standoff range: back off when too close, close in otherwise.
/// Fires every tick while a player exists.
fn attack_behavior(
    ctx: &AgentContext,
    profile: &BehaviorProfile,
    distance: f64,
) -> (Option<DVec3>, bool) {
    if ctx.player_position.is_none() {
        return (None, false);
    }
    let standoff = ctx.attack_range * profile.standoff_factor;
    let steer = chase_direction(ctx)
        .map(|toward| if distance < standoff { -toward } else { toward });
    (steer, true)
}
