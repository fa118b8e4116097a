use crate::config::ControllerConfig;
use crate::error::ControlResult;
use crate::gnc::{Controller, LandingController};
use crate::vision::MarkerDetector;
use super::log::{CycleRecord, FlightLog};
use super::scenario::Scenario;

// ---------------------------------------------------------------------------
// Scenario replay
// ---------------------------------------------------------------------------

/// Drive `controller` through every step of `scenario`.
///
/// Once the operator override is raised it latches: from that cycle on the
/// controller only supplies the altitude-shaped descent and keeps whatever
/// mode it was in.
pub fn run_with(scenario: &Scenario, controller: &mut dyn Controller) -> ControlResult<FlightLog> {
    let mut detector = scenario.detector();
    let mut records = Vec::with_capacity(scenario.len());
    let mut override_engaged = false;

    tracing::debug!(scenario = %scenario.name, controller = controller.name(), cycles = scenario.len(), "starting run");

    for (cycle, step) in scenario.steps.iter().enumerate() {
        let detection = detector.detect(()).result;

        if step.override_signal && !override_engaged {
            tracing::warn!(cycle, altitude = step.altitude, "emergency landing override engaged");
            override_engaged = true;
        }

        let (action, mode) = if override_engaged {
            (controller.emergency(step.altitude)?, controller.mode())
        } else {
            let cmd = controller.control(&detection, step.altitude)?;
            (cmd.action, cmd.mode)
        };

        records.push(CycleRecord {
            cycle,
            altitude: step.altitude,
            marker_seen: detection.marker_center.is_some(),
            mode,
            action,
            overridden: override_engaged,
        });
    }

    Ok(FlightLog { scenario: scenario.name.clone(), records })
}

/// Run with a fresh `LandingController` built from `config` (convenience wrapper).
pub fn run(scenario: &Scenario, config: &ControllerConfig) -> ControlResult<FlightLog> {
    let mut controller = LandingController::new(config.clone())?;
    run_with(scenario, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use crate::gnc::{ActionVector, Mode};
    use crate::sim::scenario::{presets, ScenarioBuilder};

    #[test]
    fn never_seen_explores_throughout() {
        let log = run(&presets::never_seen(), &ControllerConfig::default()).unwrap();
        assert!(log.records.iter().all(|r| r.mode == Mode::Exploring));
        assert!(log.records.iter().all(|r| r.action == ActionVector::hold(0.5)));
        assert_eq!(log.first_acquisition(), None);
    }

    #[test]
    fn acquire_run_lands_with_zero_throttle() {
        let log = run(&presets::acquire_and_descend(), &ControllerConfig::default()).unwrap();
        assert_eq!(log.first_acquisition(), Some(10));
        let last = log.last().unwrap();
        assert_eq!(last.mode, Mode::Landing);
        assert_eq!(last.action.throttle, 0.0);
        assert!(last.altitude <= 0.1);
    }

    #[test]
    fn intermittent_never_leaves_landing() {
        let log = run(&presets::intermittent(), &ControllerConfig::default()).unwrap();
        let first = log.first_acquisition().unwrap();
        assert!(log.records[first..].iter().all(|r| r.mode == Mode::Landing));
        assert!(log.records[first..].iter().any(|r| !r.marker_seen));
    }

    #[test]
    fn override_latches_and_descends() {
        let log = run(&presets::emergency(), &ControllerConfig::default()).unwrap();
        let engaged: Vec<&CycleRecord> = log.records.iter().filter(|r| r.overridden).collect();
        assert_eq!(engaged.first().unwrap().cycle, 6);
        assert_eq!(engaged.len(), log.len() - 6);
        for r in engaged {
            assert_eq!(r.action.roll, 0.0);
            assert_eq!(r.action.pitch, 0.0);
            assert!(r.action.throttle <= 0.0);
            assert_eq!(r.mode, Mode::Landing);
        }
        // before the override the far-off marker was being corrected
        assert!(log.records[5].action.roll > 0.0);
    }

    #[test]
    fn bad_altitude_aborts_run() {
        let s = ScenarioBuilder::new("bad").start_altitude(f64::NAN).lose(2).build();
        assert!(matches!(
            run(&s, &ControllerConfig::default()),
            Err(ControlError::NonFiniteAltitude(_))
        ));
    }
}
