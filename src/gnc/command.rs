use std::fmt;

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Controller mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No marker seen yet: hold the search throttle.
    #[default]
    Exploring,
    /// Marker acquired: center over it and descend.
    Landing,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Exploring => f.write_str("EXPLORE"),
            Mode::Landing => f.write_str("LAND"),
        }
    }
}

// ---------------------------------------------------------------------------
// Action vector [roll, pitch, yaw, throttle]
// ---------------------------------------------------------------------------

/// Actuator command for one cycle. Negative throttle asks for descent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionVector {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub throttle: f64,
}

impl ActionVector {
    pub fn new(roll: f64, pitch: f64, yaw: f64, throttle: f64) -> Self {
        Self { roll, pitch, yaw, throttle }
    }

    /// Level attitude, positive throttle.
    pub fn hold(throttle: f64) -> Self {
        Self { throttle, ..Self::default() }
    }

    /// Level attitude, throttle `-landing_throttle`.
    pub fn descend(landing_throttle: f64) -> Self {
        Self { throttle: -landing_throttle, ..Self::default() }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.roll, self.pitch, self.yaw, self.throttle]
    }

    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.roll, self.pitch, self.yaw, self.throttle)
    }
}

impl From<[f64; 4]> for ActionVector {
    fn from(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

// ---------------------------------------------------------------------------
// Cycle output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub action: ActionVector,
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descend_negates_throttle() {
        let a = ActionVector::descend(0.3);
        assert_eq!(a.as_array(), [0.0, 0.0, 0.0, -0.3]);
    }

    #[test]
    fn array_round_trip_preserves_slot_order() {
        let a = ActionVector::from([0.1, -0.2, 0.0, 0.5]);
        assert_eq!(a.roll, 0.1);
        assert_eq!(a.pitch, -0.2);
        assert_eq!(a.to_vector(), Vector4::new(0.1, -0.2, 0.0, 0.5));
    }

    #[test]
    fn mode_defaults_to_exploring() {
        assert_eq!(Mode::default(), Mode::Exploring);
        assert_eq!(Mode::Landing.to_string(), "LAND");
    }
}
