use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ControlError, ControlResult};
use crate::gnc::gains::{FixedGains, GainSchedule, InverseErrorGains};
use crate::gnc::law::CorrectionGate;
use crate::gnc::memory::MarkerMemoryPolicy;
use crate::gnc::throttle::ThrottleProfile;

// ---------------------------------------------------------------------------
// Gain policy selection
// ---------------------------------------------------------------------------

/// Which gain schedule a controller built from configuration uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainPolicy {
    /// Roll gain `kp_min`, pitch gain `kp_max`.
    #[default]
    Fixed,
    /// Gains shrink as the pixel error grows past `reference_error`.
    InverseError { reference_error: f64 },
}

/// Failure to load a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ControlError),
}

// ---------------------------------------------------------------------------
// Controller configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp_min: f64,
    pub kp_max: f64,
    pub gain_policy: GainPolicy,
    pub error_threshold: f64,          // px, per axis
    pub correction_gate: CorrectionGate,
    pub action_scale: f64,             // divides kp * error
    pub exploration_throttle: f64,     // search throttle, positive = climb/hold
    pub ground_threshold: f64,         // altitude at or below which lift is cut
    pub throttle_floor: f64,           // minimum landing throttle above ground
    pub descent_altitude: f64,         // altitude mapped to unit landing throttle
    pub initial_throttle: f64,         // throttle slot of the action held before the first cycle
    pub initial_landing_throttle: f64,
    pub marker_memory: MarkerMemoryPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp_min: 0.015,
            kp_max: 0.015,
            gain_policy: GainPolicy::Fixed,
            error_threshold: 15.0,
            correction_gate: CorrectionGate::BothAxes,
            action_scale: 10.0,
            exploration_throttle: 0.5,
            ground_threshold: 0.1,
            throttle_floor: 0.05,
            descent_altitude: 1.5,
            initial_throttle: 0.4,
            initial_landing_throttle: 0.81,
            marker_memory: MarkerMemoryPolicy::Forever,
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ControlResult<()> {
        let finite = [
            ("kp_min", self.kp_min),
            ("kp_max", self.kp_max),
            ("error_threshold", self.error_threshold),
            ("action_scale", self.action_scale),
            ("exploration_throttle", self.exploration_throttle),
            ("ground_threshold", self.ground_threshold),
            ("throttle_floor", self.throttle_floor),
            ("descent_altitude", self.descent_altitude),
            ("initial_throttle", self.initial_throttle),
            ("initial_landing_throttle", self.initial_landing_throttle),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        if self.kp_min < 0.0 {
            return Err(invalid("kp_min", "must be non-negative"));
        }
        if self.kp_min > self.kp_max {
            return Err(invalid("kp_min", "exceeds kp_max"));
        }
        if self.error_threshold < 0.0 {
            return Err(invalid("error_threshold", "must be non-negative"));
        }
        if self.action_scale <= 0.0 {
            return Err(invalid("action_scale", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.throttle_floor) {
            return Err(invalid("throttle_floor", "must lie in [0, 1]"));
        }
        if self.descent_altitude <= 0.0 {
            return Err(invalid("descent_altitude", "must be positive"));
        }
        if let GainPolicy::InverseError { reference_error } = self.gain_policy {
            if !reference_error.is_finite() || reference_error <= 0.0 {
                return Err(invalid("gain_policy.reference_error", "must be positive and finite"));
            }
        }
        Ok(())
    }

    pub fn throttle_profile(&self) -> ThrottleProfile {
        ThrottleProfile {
            ground_threshold: self.ground_threshold,
            floor: self.throttle_floor,
            descent_altitude: self.descent_altitude,
        }
    }

    /// Build the gain schedule named by `gain_policy`.
    pub fn gain_schedule(&self) -> ControlResult<Box<dyn GainSchedule>> {
        let schedule: Box<dyn GainSchedule> = match self.gain_policy {
            GainPolicy::Fixed => Box::new(FixedGains::new(self.kp_min, self.kp_max)),
            GainPolicy::InverseError { reference_error } => {
                Box::new(InverseErrorGains::new(self.kp_min, self.kp_max, reference_error)?)
            }
        };
        Ok(schedule)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ControlError {
    ControlError::InvalidConfig { field, reason }
}
