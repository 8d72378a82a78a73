//! Fundamental geometric and simulation types.

use std::fmt;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_DIRECTION_LENGTH_SQ, SHIP_FORWARD, SHIP_RIGHT, SHIP_UP};

/// Stable reference to a simulated entity.
///
/// Carries a generation, so a handle to a destroyed entity never resolves
/// to whatever later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:x}", self.0)
    }
}

/// Handle to a projectile pool slot (index + generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileHandle {
    pub index: u32,
    pub generation: u32,
}

impl ProjectileHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for ProjectileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}g{}", self.index, self.generation)
    }
}

/// Position and orientation of anything that moves.
/// Orientation is a unit quaternion; ships face local -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// World-space forward vector.
    pub fn forward(&self) -> DVec3 {
        self.orientation * SHIP_FORWARD
    }

    /// World-space right vector.
    pub fn right(&self) -> DVec3 {
        self.orientation * SHIP_RIGHT
    }

    pub fn up(&self) -> DVec3 {
        self.orientation * SHIP_UP
    }
}

/// Linear velocity (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec3);

impl Velocity {
    pub fn speed(&self) -> f64 {
        self.0.length()
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks run so far.
    pub tick: u64,
    /// Monotonic simulation clock in seconds (sum of sanitized deltas).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Normalize `v`, or `None` when it has no usable direction.
pub fn safe_normalize(v: DVec3) -> Option<DVec3> {
    if !v.is_finite() {
        return None;
    }
    let len_sq = v.length_squared();
    if len_sq < MIN_DIRECTION_LENGTH_SQ {
        return None;
    }
    Some(v / len_sq.sqrt())
}

/// Orientation whose forward axis points along `direction`.
pub fn facing(direction: DVec3) -> Option<DQuat> {
    safe_normalize(direction).map(|dir| DQuat::from_rotation_arc(SHIP_FORWARD, dir))
}

/// Clamp a frame delta into `[0, max]`; NaN and infinities become 0.
pub fn sanitize_dt(dt: f64, max: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max)
}

/// Distance between two points projected onto the XZ (orbital) plane.
pub fn planar_distance(a: DVec3, b: DVec3) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
