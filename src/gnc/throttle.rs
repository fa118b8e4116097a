use crate::error::{ControlError, ControlResult};

// ---------------------------------------------------------------------------
// Altitude-shaped landing throttle
// ---------------------------------------------------------------------------

/// Landing throttle as a function of altitude.
///
/// - at or below `ground_threshold`: 0 (lift cut)
/// - above: `altitude / descent_altitude`, never below `floor`
///
/// The magnitude shrinks linearly on final approach so the vehicle slows
/// as it nears the pad. Negative altitudes count as ground; non-finite
/// altitudes are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleProfile {
    pub ground_threshold: f64,
    pub floor: f64,
    pub descent_altitude: f64,
}

impl Default for ThrottleProfile {
    fn default() -> Self {
        Self {
            ground_threshold: 0.1,
            floor: 0.05,
            descent_altitude: 1.5,
        }
    }
}

impl ThrottleProfile {
    pub fn throttle(&self, altitude: f64) -> ControlResult<f64> {
        if !altitude.is_finite() {
            return Err(ControlError::NonFiniteAltitude(altitude));
        }
        if self.on_ground(altitude) {
            return Ok(0.0);
        }
        Ok((altitude / self.descent_altitude).max(self.floor))
    }

    pub fn on_ground(&self, altitude: f64) -> bool {
        altitude <= self.ground_threshold
    }
}
