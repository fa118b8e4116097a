use nalgebra::Vector2;

use crate::error::{ControlError, ControlResult};

// ---------------------------------------------------------------------------
// Proportional gains (roll, pitch)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub kp_roll: f64,
    pub kp_pitch: f64,
}

impl Gains {
    /// Limit both axes to `[kp_min, kp_max]`. A NaN gain lands on `kp_min`.
    pub fn bounded(self, kp_min: f64, kp_max: f64) -> Self {
        Self {
            kp_roll: self.kp_roll.max(kp_min).min(kp_max),
            kp_pitch: self.kp_pitch.max(kp_min).min(kp_max),
        }
    }
}

/// Maps the current pixel error to a gain pair.
///
/// Every schedule must return gains inside its own `[kp_min, kp_max]`.
pub trait GainSchedule: Send {
    fn gains(&self, error: &Vector2<f64>) -> Gains;

    fn name(&self) -> &str {
        "unnamed"
    }
}

// ---------------------------------------------------------------------------
// Fixed gains
// ---------------------------------------------------------------------------

/// Roll uses the lower bound, pitch the upper. With the default equal
/// bounds both axes share one gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGains {
    pub kp_min: f64,
    pub kp_max: f64,
}

impl FixedGains {
    pub fn new(kp_min: f64, kp_max: f64) -> Self {
        Self { kp_min, kp_max }
    }
}

impl GainSchedule for FixedGains {
    fn gains(&self, _error: &Vector2<f64>) -> Gains {
        Gains { kp_roll: self.kp_min, kp_pitch: self.kp_max }
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

// ---------------------------------------------------------------------------
// Inverse-error gains
// ---------------------------------------------------------------------------

/// Full gain while an axis error is within `reference_error`, falling off
/// as `reference_error / |e|` beyond it, never below `kp_min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseErrorGains {
    pub kp_min: f64,
    pub kp_max: f64,
    pub reference_error: f64, // px
}

impl InverseErrorGains {
    pub fn new(kp_min: f64, kp_max: f64, reference_error: f64) -> ControlResult<Self> {
        if !(kp_min.is_finite() && kp_max.is_finite()) {
            return Err(invalid("kp_min/kp_max", "must be finite"));
        }
        if kp_min < 0.0 {
            return Err(invalid("kp_min", "must be non-negative"));
        }
        if kp_min > kp_max {
            return Err(invalid("kp_min", "exceeds kp_max"));
        }
        if !reference_error.is_finite() || reference_error <= 0.0 {
            return Err(invalid("reference_error", "must be positive and finite"));
        }
        Ok(Self { kp_min, kp_max, reference_error })
    }

    fn axis(&self, e: f64) -> f64 {
        let mag = e.abs();
        if mag <= f64::EPSILON {
            return self.kp_max;
        }
        // unlike f64::clamp, never panics on inverted bounds
        (self.kp_max * self.reference_error / mag).max(self.kp_min).min(self.kp_max)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ControlError {
    ControlError::InvalidConfig { field, reason }
}

impl GainSchedule for InverseErrorGains {
    fn gains(&self, error: &Vector2<f64>) -> Gains {
        Gains { kp_roll: self.axis(error.x), kp_pitch: self.axis(error.y) }
    }

    fn name(&self) -> &str {
        "inverse_error"
    }
}
