//! Enemy AI for STARFLIGHT.
//!
//! Implements the patrol/chase/attack state machine and the per-class
//! behavior profiles that tune it.

pub mod fsm;
pub mod profiles;

pub use starflight_core as core;
