//! Capability traits shared by the systems.
//!
//! Components stay plain data; the behavior every system relies on lives in
//! these traits. Ships are `Movable + Damageable + Weaponized`, celestial
//! bodies are `Orbiting`.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use starflight_core::components::{KinematicBody, OrbitalBody, Weapon};
use starflight_core::types::{facing, safe_normalize, Transform, Velocity};

/// Something that flies under its own power.
pub trait Movable {
    fn transform(&self) -> &Transform;
    fn velocity(&self) -> DVec3;
    /// Replace velocity outright (autopilot blending).
    fn set_velocity(&mut self, velocity: DVec3);
    /// Current speed cap, including any turbo multiplier.
    fn speed_cap(&self) -> f64;
    fn has_fuel(&self) -> bool;

    /// Accelerate along a world direction. Refused without fuel or without a
    /// usable direction; returns whether thrust was applied.
    fn thrust(&mut self, direction: DVec3, dt: f64) -> bool;

    /// Reduce speed by at most `deceleration * dt`, stopping exactly at zero.
    fn brake(&mut self, dt: f64);

    /// Rotate about a local axis by `rotation_speed * dt`. The sign of the
    /// axis selects the direction.
    fn rotate_local(&mut self, axis: DVec3, dt: f64);

    /// Slerp toward facing `direction` at `rotation_speed * dt`.
    fn turn_toward(&mut self, direction: DVec3, dt: f64);

    /// Snap to facing `direction`.
    fn face(&mut self, direction: DVec3);

    /// Advance position and burn fuel. Enforces the speed cap first.
    fn integrate(&mut self, dt: f64);
}

/// Mutable view over one ship's movement components.
pub struct ShipBody<'a> {
    pub transform: &'a mut Transform,
    pub velocity: &'a mut Velocity,
    pub body: &'a mut KinematicBody,
}

impl<'a> ShipBody<'a> {
    pub fn new(
        transform: &'a mut Transform,
        velocity: &'a mut Velocity,
        body: &'a mut KinematicBody,
    ) -> Self {
        Self {
            transform,
            velocity,
            body,
        }
    }

    fn clamp_speed(&mut self) {
        let cap = self.speed_cap();
        let speed = self.velocity.speed();
        if speed > cap {
            self.velocity.0 *= cap / speed;
        }
    }
}

impl Movable for ShipBody<'_> {
    fn transform(&self) -> &Transform {
        self.transform
    }

    fn velocity(&self) -> DVec3 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: DVec3) {
        if velocity.is_finite() {
            self.velocity.0 = velocity;
        }
    }

    fn speed_cap(&self) -> f64 {
        self.body.max_speed * self.body.speed_multiplier
    }

    fn has_fuel(&self) -> bool {
        self.body.fuel > 0.0
    }

    fn thrust(&mut self, direction: DVec3, dt: f64) -> bool {
        if !self.has_fuel() {
            return false;
        }
        let Some(dir) = safe_normalize(direction) else {
            return false;
        };
        let accel = self.body.acceleration * self.body.speed_multiplier;
        self.velocity.0 += dir * accel * dt;
        self.clamp_speed();
        true
    }

    fn brake(&mut self, dt: f64) {
        let speed = self.velocity.speed();
        if speed <= 0.0 {
            return;
        }
        let remaining = speed - (self.body.deceleration * dt).min(speed);
        if remaining <= 0.0 {
            self.velocity.0 = DVec3::ZERO;
        } else {
            self.velocity.0 *= remaining / speed;
        }
    }

    fn rotate_local(&mut self, axis: DVec3, dt: f64) {
        let Some(axis) = safe_normalize(axis) else {
            return;
        };
        let step = DQuat::from_axis_angle(axis, self.body.rotation_speed * dt);
        self.transform.orientation = (self.transform.orientation * step).normalize();
    }

    fn turn_toward(&mut self, direction: DVec3, dt: f64) {
        let Some(target) = facing(direction) else {
            return;
        };
        let t = (self.body.rotation_speed * dt).clamp(0.0, 1.0);
        self.transform.orientation = self.transform.orientation.slerp(target, t).normalize();
    }

    fn face(&mut self, direction: DVec3) {
        if let Some(target) = facing(direction) {
            self.transform.orientation = target;
        }
    }

    fn integrate(&mut self, dt: f64) {
        self.clamp_speed();
        self.transform.position += self.velocity.0 * dt;
        if self.velocity.speed() > 0.0 {
            self.body.fuel = (self.body.fuel - self.body.fuel_consumption * dt).max(0.0);
        }
    }
}

/// Result of one `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Health actually removed.
    pub applied: f64,
    pub remaining: f64,
    /// True only on the call that took health to zero.
    pub destroyed_now: bool,
}

pub trait Damageable {
    fn health(&self) -> f64;
    fn is_destroyed(&self) -> bool;
    /// Clamp-subtract `amount`. Destruction triggers once; later calls are no-ops.
    fn take_damage(&mut self, amount: f64) -> DamageOutcome;
}

impl Damageable for KinematicBody {
    fn health(&self) -> f64 {
        self.health
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn take_damage(&mut self, amount: f64) -> DamageOutcome {
        if self.destroyed || !amount.is_finite() || amount <= 0.0 {
            return DamageOutcome {
                applied: 0.0,
                remaining: self.health,
                destroyed_now: false,
            };
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        let destroyed_now = self.health <= 0.0;
        if destroyed_now {
            self.destroyed = true;
        }
        DamageOutcome {
            applied: before - self.health,
            remaining: self.health,
            destroyed_now,
        }
    }
}

pub trait Orbiting {
    /// Accumulate visual spin.
    fn spin(&mut self, dt: f64);
    /// Next position on the circular orbit. The angle is re-derived from
    /// `position` every call, so external moves are respected.
    fn orbit_step(&self, position: DVec3, dt: f64) -> DVec3;
    fn is_orbiting(&self) -> bool;
    /// Linear velocity along the orbit at `position`.
    fn tangential_velocity(&self, position: DVec3) -> DVec3;
}

impl Orbiting for OrbitalBody {
    fn spin(&mut self, dt: f64) {
        self.self_rotation = (self.self_rotation + self.self_rotation_speed * dt).rem_euclid(TAU);
    }

    fn orbit_step(&self, position: DVec3, dt: f64) -> DVec3 {
        if !self.is_orbiting() {
            return position;
        }
        let center = self.orbit_center;
        let angle = (position.z - center.z).atan2(position.x - center.x) + self.orbit_speed * dt;
        DVec3::new(
            center.x + self.orbit_distance * angle.cos(),
            position.y,
            center.z + self.orbit_distance * angle.sin(),
        )
    }

    fn is_orbiting(&self) -> bool {
        self.orbit_speed != 0.0
    }

    fn tangential_velocity(&self, position: DVec3) -> DVec3 {
        if !self.is_orbiting() {
            return DVec3::ZERO;
        }
        let Some(radial) = safe_normalize(position - self.orbit_center) else {
            return DVec3::ZERO;
        };
        let tangent = safe_normalize(DVec3::new(-radial.z, 0.0, radial.x)).unwrap_or(DVec3::ZERO);
        tangent * self.orbit_distance * self.orbit_speed
    }
}

pub trait Weaponized {
    /// Whether the cooldown has elapsed at simulation time `now`.
    fn ready(&self, now: f64) -> bool;
    /// Left and right muzzle points for the given hull transform.
    fn muzzles(&self, transform: &Transform) -> [DVec3; 2];
    fn mark_fired(&mut self, now: f64);
}

impl Weaponized for Weapon {
    fn ready(&self, now: f64) -> bool {
        match self.last_fire_time {
            Some(last) => now - last >= self.cooldown_secs,
            None => true,
        }
    }

    fn muzzles(&self, transform: &Transform) -> [DVec3; 2] {
        let right = transform.right() * self.wing_offset;
        let ahead = transform.position + transform.forward() * self.barrel_offset;
        [ahead - right, ahead + right]
    }

    fn mark_fired(&mut self, now: f64) {
        self.last_fire_time = Some(now);
    }
}
