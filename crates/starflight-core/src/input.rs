//! Pilot input: edge events in, one flag snapshot per tick out.
//!
//! The input source reports press/release edges for abstract controls;
//! physical key identity never reaches the simulation.

use serde::{Deserialize, Serialize};

/// Held controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    Turbo,
    Brake,
    Fire,
}

/// Edge event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "control")]
pub enum InputEvent {
    Pressed(Control),
    Released(Control),
    ToggleAutopilot,
}

/// Input state for one tick, passed by value into the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub turbo: bool,
    pub brake: bool,
    pub fire: bool,
    /// Autopilot toggle pressed since the previous snapshot.
    pub toggle_autopilot: bool,
}

impl InputSnapshot {
    fn flag_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::YawLeft => &mut self.yaw_left,
            Control::YawRight => &mut self.yaw_right,
            Control::PitchUp => &mut self.pitch_up,
            Control::PitchDown => &mut self.pitch_down,
            Control::RollLeft => &mut self.roll_left,
            Control::RollRight => &mut self.roll_right,
            Control::Turbo => &mut self.turbo,
            Control::Brake => &mut self.brake,
            Control::Fire => &mut self.fire,
        }
    }

    /// Builder used by tests and scripted runs.
    pub fn with(mut self, control: Control) -> Self {
        *self.flag_mut(control) = true;
        self
    }
}

/// Accumulates edge events between ticks.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: InputSnapshot,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(control) => *self.held.flag_mut(control) = true,
            InputEvent::Released(control) => *self.held.flag_mut(control) = false,
            InputEvent::ToggleAutopilot => self.held.toggle_autopilot = true,
        }
    }

    /// Current flags. Consumes a pending autopilot toggle.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = self.held;
        self.held.toggle_autopilot = false;
        snapshot
    }
}
