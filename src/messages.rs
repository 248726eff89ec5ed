// Data types shared between the input sources, the control law and the sender

use serde::{Deserialize, Serialize};

// One two-axis tilt reading from the operator's device.
// Nominally in [-1, 1] per axis but the source does not guarantee bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TiltSample {
    pub x: f64,
    pub y: f64,
}

// Signed speed pair for the two drive motors.
// Positive = forward, negative = reverse, zero = stopped.
// Components stay in [-127, 127]; -128 is never produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: i8,
    pub right: i8,
}

impl MotorCommand {
    pub fn new(left: i8, right: i8) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Run/stop flag gating the periodic transmission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriveState {
    Stopped,
    Running,
}
