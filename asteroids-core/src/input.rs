use serde::{Deserialize, Serialize};

/// Held controls. Each stays on between a `Hold` and the matching `Release`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    RotateLeft,
    RotateRight,
    ThrustForward,
    ThrustReverse,
}

/// Host intents, applied immediately between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Hold(Control),
    Release(Control),
    Fire,
    Hyperspace,
    TogglePause,
    ToggleMute,
    ToggleDetail,
    StartSession,
    EndSession,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_reverse: bool,
}

impl ControlState {
    pub fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::RotateLeft => self.rotate_left = held,
            Control::RotateRight => self.rotate_right = held,
            Control::ThrustForward => self.thrust_forward = held,
            Control::ThrustReverse => self.thrust_reverse = held,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::RotateLeft => self.rotate_left,
            Control::RotateRight => self.rotate_right,
            Control::ThrustForward => self.thrust_forward,
            Control::ThrustReverse => self.thrust_reverse,
        }
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrust_forward || self.thrust_reverse
    }
}
