//! Kinematic integration system.
//!
//! Updates ship positions from velocity each tick and burns fuel while moving.

use hecs::World;

use starflight_core::components::KinematicBody;
use starflight_core::types::{Transform, Velocity};

use crate::capabilities::{Movable, ShipBody};

/// Integrate every live ship by `dt` seconds.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (transform, velocity, body)) in
        world.query_mut::<(&mut Transform, &mut Velocity, &mut KinematicBody)>()
    {
        if body.destroyed {
            continue;
        }
        ShipBody::new(transform, velocity, body).integrate(dt);
    }
}
