use super::command::{ActionVector, Command, Mode};
use crate::error::ControlResult;
use crate::vision::DetectionResult;

/// Trait for landing controllers.
///
/// Implement this to plug a custom controller into the run harness.
pub trait Controller {
    /// One control cycle: detection and altitude in, action and mode out.
    fn control(&mut self, detection: &DetectionResult, altitude: f64) -> ControlResult<Command>;

    /// Operator override: pure altitude-shaped descent, no marker tracking.
    fn emergency(&mut self, altitude: f64) -> ControlResult<ActionVector>;

    fn mode(&self) -> Mode;

    /// Forget everything learned during the flight.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
