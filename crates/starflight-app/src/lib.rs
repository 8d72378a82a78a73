//! Headless starflight runner.
//!
//! Wires the simulation engine to a fixed-rate game-loop thread and feeds it
//! pilot input over a channel.

pub mod cli;
pub mod game_loop;
pub mod state;

pub use starflight_core as core;
