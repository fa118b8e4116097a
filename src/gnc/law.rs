use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::command::ActionVector;
use super::gains::Gains;
use crate::vision::Point2D;

// ---------------------------------------------------------------------------
// Position error
// ---------------------------------------------------------------------------

/// `marker - image_center` in pixels. +x: marker right of center,
/// +y: marker below center.
pub fn position_error(image_center: &Point2D, marker_center: &Point2D) -> Vector2<f64> {
    marker_center - image_center
}

// ---------------------------------------------------------------------------
// Proportional law
// ---------------------------------------------------------------------------

/// Roll follows +x error, pitch opposes +y error, both divided by `scale`.
/// Yaw and throttle are left at zero.
pub fn proportional_action(error: &Vector2<f64>, gains: &Gains, scale: f64) -> ActionVector {
    ActionVector {
        roll: gains.kp_roll * error.x / scale,
        pitch: -gains.kp_pitch * error.y / scale,
        yaw: 0.0,
        throttle: 0.0,
    }
}

// ---------------------------------------------------------------------------
// Correction gate
// ---------------------------------------------------------------------------

/// Decides whether an error is large enough to correct instead of descend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionGate {
    /// Correct only when both axes exceed the threshold. A large error on
    /// one axis alone still descends.
    #[default]
    BothAxes,
    /// Correct when either axis exceeds the threshold.
    EitherAxis,
}

impl CorrectionGate {
    pub fn needs_correction(&self, error: &Vector2<f64>, threshold: f64) -> bool {
        let x = error.x.abs() > threshold;
        let y = error.y.abs() > threshold;
        match self {
            CorrectionGate::BothAxes => x && y,
            CorrectionGate::EitherAxis => x || y,
        }
    }
}
