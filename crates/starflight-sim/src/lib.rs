//! Simulation engine for starflight.
//!
//! Owns the hecs ECS world and the projectile pool, runs the systems in a
//! fixed order each tick, and produces `SimSnapshot`s for the frontend.

pub mod capabilities;
pub mod engine;
pub mod projectile_pool;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use starflight_core as core;

#[cfg(test)]
mod tests;
