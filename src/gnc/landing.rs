use std::fmt;

use nalgebra::Vector2;

use super::command::{ActionVector, Command, Mode};
use super::gains::{GainSchedule, Gains};
use super::law::{position_error, proportional_action};
use super::memory::{EffectiveMarker, MarkerMemory, MarkerSource};
use super::throttle::ThrottleProfile;
use crate::config::ControllerConfig;
use crate::error::ControlResult;
use crate::vision::{Detection, DetectionResult, MarkerDetector, Point2D};

// ---------------------------------------------------------------------------
// Landing controller: marker search, centering, shaped descent
// ---------------------------------------------------------------------------

/// Vision-guided landing controller.
///
/// Starts in `Exploring`, holding the search throttle. The first marker
/// sighting switches to `Landing` for the rest of the flight: large
/// centering errors produce a proportional roll/pitch command with zero
/// throttle, small errors produce a level descent whose magnitude shrinks
/// with altitude. When detection drops out the last sighting stands in.
pub struct LandingController {
    config: ControllerConfig,
    profile: ThrottleProfile,
    schedule: Box<dyn GainSchedule>,
    memory: MarkerMemory,
    mode: Mode,
    gains: Gains,
    last_throttle: f64,
    last_action: ActionVector,
    cycles: u64,
}

impl LandingController {
    pub fn new(config: ControllerConfig) -> ControlResult<Self> {
        config.validate()?;
        let schedule = config.gain_schedule()?;
        Self::with_gain_schedule(config, schedule)
    }

    /// Build with a caller-supplied gain schedule instead of the one named
    /// in the configuration. Whatever the schedule returns is held to the
    /// configured `[kp_min, kp_max]`.
    pub fn with_gain_schedule(
        config: ControllerConfig,
        schedule: Box<dyn GainSchedule>,
    ) -> ControlResult<Self> {
        config.validate()?;
        let gains = schedule.gains(&Vector2::zeros()).bounded(config.kp_min, config.kp_max);
        Ok(Self {
            profile: config.throttle_profile(),
            memory: MarkerMemory::new(config.marker_memory),
            mode: Mode::Exploring,
            gains,
            last_throttle: config.initial_landing_throttle,
            last_action: ActionVector::hold(config.initial_throttle),
            cycles: 0,
            schedule,
            config,
        })
    }

    /// Run one control cycle.
    ///
    /// Inputs are checked before any state changes, so a rejected cycle
    /// leaves the controller exactly as it was.
    pub fn compute_action(
        &mut self,
        detection: &DetectionResult,
        altitude: f64,
    ) -> ControlResult<Command> {
        detection.validate()?;
        let throttle_landing = self.shaped_throttle(altitude)?;
        self.cycles += 1;

        let effective = self.memory.observe(detection.marker_center);
        self.update_mode(effective);

        let action = match self.mode {
            Mode::Landing => match effective {
                Some(marker) => self.track(&detection.image_center, &marker, throttle_landing),
                // Memory expired: keep descending without a target.
                None => ActionVector::descend(throttle_landing),
            },
            Mode::Exploring => ActionVector::hold(self.config.exploration_throttle),
        };

        self.last_action = action;
        Ok(Command { action, mode: self.mode })
    }

    /// Detect on `frame`, then run one cycle. The detector's annotated frame
    /// is returned untouched.
    pub fn step<D: MarkerDetector>(
        &mut self,
        detector: &mut D,
        frame: D::Frame,
        altitude: f64,
    ) -> ControlResult<(Command, D::Annotated)> {
        let Detection { result, annotated } = detector.detect(frame);
        let command = self.compute_action(&result, altitude)?;
        Ok((command, annotated))
    }

    /// Altitude-shaped landing throttle, usable outside the main cycle for
    /// an operator-forced descent. Mode and marker memory are untouched.
    pub fn emergency_throttle(&mut self, altitude: f64) -> ControlResult<f64> {
        self.shaped_throttle(altitude)
    }

    /// The ground cut is not retained: `last_throttle` keeps the last
    /// airborne value.
    fn shaped_throttle(&mut self, altitude: f64) -> ControlResult<f64> {
        let t = self.profile.throttle(altitude)?;
        if !self.profile.on_ground(altitude) {
            self.last_throttle = t;
        }
        Ok(t)
    }

    fn scheduled_gains(&self, error: &Vector2<f64>) -> Gains {
        self.schedule.gains(error).bounded(self.config.kp_min, self.config.kp_max)
    }

    fn update_mode(&mut self, effective: Option<EffectiveMarker>) {
        let Some(marker) = effective else {
            return;
        };
        match (self.mode, marker.source) {
            (Mode::Exploring, _) => {
                tracing::info!(
                    cycle = self.cycles,
                    x = marker.center.x,
                    y = marker.center.y,
                    "marker acquired, switching to landing"
                );
                self.mode = Mode::Landing;
            }
            (Mode::Landing, MarkerSource::Remembered { age: 1 }) => {
                tracing::debug!(cycle = self.cycles, "detection lost, holding last marker position");
            }
            _ => {}
        }
    }

    fn track(&mut self, image_center: &Point2D, marker: &EffectiveMarker, throttle_landing: f64) -> ActionVector {
        let error = position_error(image_center, &marker.center);
        if self.config.correction_gate.needs_correction(&error, self.config.error_threshold) {
            self.gains = self.scheduled_gains(&error);
            proportional_action(&error, &self.gains, self.config.action_scale)
        } else {
            ActionVector::descend(throttle_landing)
        }
    }

    /// Back to the power-on state for a new flight.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.mode = Mode::Exploring;
        self.gains = self.scheduled_gains(&Vector2::zeros());
        self.last_throttle = self.config.initial_landing_throttle;
        self.last_action = ActionVector::hold(self.config.initial_throttle);
        self.cycles = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_action(&self) -> ActionVector {
        self.last_action
    }

    pub fn last_throttle(&self) -> f64 {
        self.last_throttle
    }

    pub fn last_marker_center(&self) -> Option<Point2D> {
        self.memory.last()
    }

    /// Gains applied on the most recent correcting cycle.
    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl fmt::Debug for LandingController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandingController")
            .field("mode", &self.mode)
            .field("schedule", &self.schedule.name())
            .field("memory", &self.memory.policy())
            .field("last_marker", &self.memory.last())
            .field("last_throttle", &self.last_throttle)
            .field("last_action", &self.last_action)
            .field("cycles", &self.cycles)
            .finish()
    }
}

impl super::Controller for LandingController {
    fn control(&mut self, detection: &DetectionResult, altitude: f64) -> ControlResult<Command> {
        self.compute_action(detection, altitude)
    }

    fn emergency(&mut self, altitude: f64) -> ControlResult<ActionVector> {
        let action = ActionVector::descend(self.emergency_throttle(altitude)?);
        self.last_action = action;
        Ok(action)
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn reset(&mut self) {
        LandingController::reset(self);
    }

    fn name(&self) -> &str {
        "LandingController"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GainPolicy;
    use crate::error::ControlError;
    use crate::gnc::gains::{FixedGains, InverseErrorGains};
    use crate::gnc::law::CorrectionGate;
    use crate::gnc::memory::MarkerMemoryPolicy;
    use crate::vision::ReplayDetector;

    fn center() -> Point2D {
        Point2D::new(320.0, 240.0)
    }

    fn controller() -> LandingController {
        LandingController::new(ControllerConfig::default()).unwrap()
    }

    fn seen(x: f64, y: f64) -> DetectionResult {
        DetectionResult::found(center(), Point2D::new(x, y))
    }

    fn lost() -> DetectionResult {
        DetectionResult::missing(center())
    }

    #[test]
    fn explores_until_first_sighting() {
        let mut c = controller();
        let cmd = c.compute_action(&lost(), 2.0).unwrap();
        assert_eq!(cmd.mode, Mode::Exploring);
        assert_eq!(cmd.action.as_array(), [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(c.last_marker_center(), None);
    }

    #[test]
    fn large_error_on_both_axes_corrects_without_throttle() {
        let mut c = controller();
        let cmd = c.compute_action(&seen(340.0, 260.0), 1.0).unwrap();
        assert_eq!(cmd.mode, Mode::Landing);
        assert!((cmd.action.roll - 0.015 * 20.0 / 10.0).abs() < 1e-12);
        assert!((cmd.action.pitch + 0.015 * 20.0 / 10.0).abs() < 1e-12);
        assert_eq!(cmd.action.yaw, 0.0);
        assert_eq!(cmd.action.throttle, 0.0);
    }

    #[test]
    fn small_error_descends() {
        let mut c = controller();
        let cmd = c.compute_action(&seen(325.0, 245.0), 0.9).unwrap();
        assert_eq!(cmd.mode, Mode::Landing);
        assert_eq!(cmd.action.roll, 0.0);
        assert_eq!(cmd.action.pitch, 0.0);
        assert!((cmd.action.throttle + 0.6).abs() < 1e-12);
        assert!((c.last_throttle() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn single_axis_error_descends_under_default_gate() {
        let mut c = controller();
        let cmd = c.compute_action(&seen(500.0, 240.0), 0.9).unwrap();
        assert_eq!(cmd.action.roll, 0.0);
        assert!(cmd.action.throttle < 0.0);
    }

    #[test]
    fn either_axis_gate_corrects_single_axis_error() {
        let config = ControllerConfig { correction_gate: CorrectionGate::EitherAxis, ..Default::default() };
        let mut c = LandingController::new(config).unwrap();
        let cmd = c.compute_action(&seen(500.0, 240.0), 0.9).unwrap();
        assert!((cmd.action.roll - 0.015 * 180.0 / 10.0).abs() < 1e-12);
        assert_eq!(cmd.action.pitch, 0.0);
        assert_eq!(cmd.action.throttle, 0.0);
    }

    #[test]
    fn lost_detection_steers_on_last_sighting() {
        let mut c = controller();
        let live = c.compute_action(&seen(400.0, 200.0), 1.0).unwrap();
        let recalled = c.compute_action(&lost(), 1.0).unwrap();
        assert_eq!(recalled.mode, Mode::Landing);
        assert_eq!(recalled.action, live.action);
        assert_eq!(c.last_marker_center(), Some(Point2D::new(400.0, 200.0)));
    }

    #[test]
    fn marker_above_center_commands_positive_pitch() {
        let config = ControllerConfig { correction_gate: CorrectionGate::EitherAxis, ..Default::default() };
        let mut c = LandingController::new(config).unwrap();
        let cmd = c.compute_action(&seen(320.0, 200.0), 1.0).unwrap();
        assert!((cmd.action.pitch - 0.06).abs() < 1e-12);
    }

    #[test]
    fn expired_memory_descends_blind_in_landing() {
        let config = ControllerConfig { marker_memory: MarkerMemoryPolicy::Cycles(1), ..Default::default() };
        let mut c = LandingController::new(config).unwrap();
        c.compute_action(&seen(400.0, 200.0), 1.5).unwrap();
        let recalled = c.compute_action(&lost(), 1.5).unwrap();
        assert_eq!(recalled.action.throttle, 0.0); // still correcting
        let blind = c.compute_action(&lost(), 1.5).unwrap();
        assert_eq!(blind.mode, Mode::Landing);
        assert_eq!(blind.action, ActionVector::descend(1.0));
        assert_eq!(c.last_marker_center(), None);
    }

    #[test]
    fn rejected_cycle_leaves_state_untouched() {
        let mut c = controller();
        let before = c.last_action();
        assert!(matches!(
            c.compute_action(&seen(400.0, 200.0), f64::NAN),
            Err(ControlError::NonFiniteAltitude(_))
        ));
        assert_eq!(c.mode(), Mode::Exploring);
        assert_eq!(c.last_marker_center(), None);
        assert_eq!(c.last_action(), before);
        assert_eq!(c.cycles(), 0);

        let bad = DetectionResult::found(center(), Point2D::new(f64::NAN, 1.0));
        assert!(c.compute_action(&bad, 1.0).is_err());
        assert_eq!(c.mode(), Mode::Exploring);
    }

    #[test]
    fn initial_state_holds_power_on_values() {
        let c = controller();
        assert_eq!(c.last_action(), ActionVector::hold(0.4));
        assert!((c.last_throttle() - 0.81).abs() < 1e-12);
        assert_eq!(c.gains(), Gains { kp_roll: 0.015, kp_pitch: 0.015 });
    }

    #[test]
    fn emergency_throttle_ignores_tracking_state() {
        let mut c = controller();
        assert!((c.emergency_throttle(0.75).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(c.emergency_throttle(0.05).unwrap(), 0.0);
        assert!((c.last_throttle() - 0.5).abs() < 1e-12);
        assert_eq!(c.mode(), Mode::Exploring);
    }

    #[test]
    fn ground_cycle_keeps_last_airborne_throttle() {
        let mut c = controller();
        c.compute_action(&seen(325.0, 245.0), 0.9).unwrap();
        let cmd = c.compute_action(&seen(325.0, 245.0), 0.05).unwrap();
        assert_eq!(cmd.action.throttle, 0.0);
        assert!((c.last_throttle() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn step_passes_annotation_through() {
        let mut c = controller();
        let mut det = ReplayDetector::new(center(), vec![None, Some(Point2D::new(330.0, 250.0))]);
        let (cmd, idx) = c.step(&mut det, (), 2.0).unwrap();
        assert_eq!((cmd.mode, idx), (Mode::Exploring, 0));
        let (cmd, idx) = c.step(&mut det, (), 0.3).unwrap();
        assert_eq!((cmd.mode, idx), (Mode::Landing, 1));
        assert!((cmd.action.throttle + 0.2).abs() < 1e-12);
    }

    #[test]
    fn injected_schedule_drives_gains() {
        let config = ControllerConfig { kp_min: 0.01, kp_max: 0.03, ..Default::default() };
        let mut c = LandingController::with_gain_schedule(config, Box::new(FixedGains::new(0.01, 0.03))).unwrap();
        let cmd = c.compute_action(&seen(340.0, 260.0), 1.0).unwrap();
        assert!((cmd.action.roll - 0.02).abs() < 1e-12);
        assert!((cmd.action.pitch + 0.06).abs() < 1e-12);
    }

    #[test]
    fn injected_schedule_held_to_configured_bounds() {
        let wide = InverseErrorGains { kp_min: 0.0, kp_max: 0.5, reference_error: 40.0 };
        let mut c = LandingController::with_gain_schedule(ControllerConfig::default(), Box::new(wide)).unwrap();
        assert_eq!(c.gains(), Gains { kp_roll: 0.015, kp_pitch: 0.015 });
        c.compute_action(&seen(340.0, 260.0), 1.0).unwrap();
        assert_eq!(c.gains(), Gains { kp_roll: 0.015, kp_pitch: 0.015 });

        let inverted = InverseErrorGains { kp_min: 0.02, kp_max: 0.01, reference_error: 40.0 };
        let mut c = LandingController::with_gain_schedule(ControllerConfig::default(), Box::new(inverted)).unwrap();
        let cmd = c.compute_action(&seen(340.0, 260.0), 1.0).unwrap();
        assert!((cmd.action.roll - 0.03).abs() < 1e-12);
        assert_eq!(c.gains(), Gains { kp_roll: 0.015, kp_pitch: 0.015 });
    }

    #[test]
    fn inverse_error_policy_from_config() {
        let config = ControllerConfig {
            kp_min: 0.005,
            kp_max: 0.02,
            gain_policy: GainPolicy::InverseError { reference_error: 20.0 },
            ..Default::default()
        };
        let mut c = LandingController::new(config).unwrap();
        c.compute_action(&seen(360.0, 280.0), 1.0).unwrap();
        let g = c.gains();
        assert!((g.kp_roll - 0.01).abs() < 1e-12);
        assert!((g.kp_pitch - 0.01).abs() < 1e-12);
    }

    #[test]
    fn invalid_config_refused() {
        let config = ControllerConfig { action_scale: 0.0, ..Default::default() };
        assert!(LandingController::new(config).is_err());
    }

    #[test]
    fn reset_returns_to_exploring() {
        let mut c = controller();
        c.compute_action(&seen(400.0, 200.0), 1.0).unwrap();
        c.reset();
        assert_eq!(c.mode(), Mode::Exploring);
        assert_eq!(c.last_marker_center(), None);
        let cmd = c.compute_action(&lost(), 1.0).unwrap();
        assert_eq!(cmd.action, ActionVector::hold(0.5));
    }
}
