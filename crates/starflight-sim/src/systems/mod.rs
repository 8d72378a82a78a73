//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus whatever engine-owned resources they need, passed explicitly.
//! They do not own state. All state lives in components and the engine.

pub mod autopilot;
pub mod cleanup;
pub mod combat;
pub mod enemy_ai;
pub mod movement;
pub mod orbital;
pub mod player_control;
pub mod projectiles;
pub mod snapshot;
pub mod targeting;
