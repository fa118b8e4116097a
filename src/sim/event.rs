use crate::gnc::{ActionVector, Mode};
use super::log::{CycleRecord, FlightLog};

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Acquired,
    DetectionLost,
    DetectionRecovered,
    OverrideEngaged,
    Touchdown,
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone)]
pub struct FlightEvent {
    pub cycle: usize,
    pub kind: EventKind,
    pub record: CycleRecord,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive cycle records and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind>;
}

/// Detects the switch from exploring to landing.
pub struct AcquisitionDetector;

impl EventDetector for AcquisitionDetector {
    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        if prev.mode == Mode::Exploring && current.mode == Mode::Landing {
            Some(EventKind::Acquired)
        } else {
            None
        }
    }
}

/// Detects the marker dropping out of view and coming back while landing.
pub struct DetectionLossDetector;

impl EventDetector for DetectionLossDetector {
    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        if current.mode != Mode::Landing {
            return None;
        }
        match (prev.marker_seen, current.marker_seen) {
            (true, false) => Some(EventKind::DetectionLost),
            (false, true) if prev.mode == Mode::Landing => Some(EventKind::DetectionRecovered),
            _ => None,
        }
    }
}

pub struct OverrideDetector;

impl EventDetector for OverrideDetector {
    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        if !prev.overridden && current.overridden {
            Some(EventKind::OverrideEngaged)
        } else {
            None
        }
    }
}

/// Detects the first crossing to or below ground level.
pub struct TouchdownDetector {
    pub ground_threshold: f64,
    fired: bool,
}

impl TouchdownDetector {
    pub fn new(ground_threshold: f64) -> Self {
        Self { ground_threshold, fired: false }
    }
}

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.altitude > self.ground_threshold && current.altitude <= self.ground_threshold {
            self.fired = true;
            Some(EventKind::Touchdown)
        } else {
            None
        }
    }
}

pub fn standard_detectors(ground_threshold: f64) -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(AcquisitionDetector),
        Box::new(DetectionLossDetector),
        Box::new(OverrideDetector),
        Box::new(TouchdownDetector::new(ground_threshold)),
    ]
}

/// Run every detector over consecutive records of `log`.
///
/// The first record is compared against a power-on record at the same
/// altitude, so an acquisition on cycle 0 is still reported.
pub fn scan(log: &FlightLog, detectors: &mut [Box<dyn EventDetector>]) -> Vec<FlightEvent> {
    let Some(first) = log.records.first() else {
        return vec![];
    };
    let power_on = CycleRecord {
        cycle: 0,
        altitude: first.altitude,
        marker_seen: false,
        mode: Mode::Exploring,
        action: ActionVector::default(),
        overridden: false,
    };

    let mut events = vec![];
    let mut prev = &power_on;
    for current in &log.records {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, current) {
                events.push(FlightEvent { cycle: current.cycle, kind, record: *current });
            }
        }
        prev = current;
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cycle: usize, alt: f64, seen: bool, mode: Mode) -> CycleRecord {
        CycleRecord {
            cycle,
            altitude: alt,
            marker_seen: seen,
            mode,
            action: ActionVector::default(),
            overridden: false,
        }
    }

    #[test]
    fn acquisition_detected() {
        let mut det = AcquisitionDetector;
        let prev = rec(0, 2.0, false, Mode::Exploring);
        let curr = rec(1, 2.0, true, Mode::Landing);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Acquired));
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn loss_and_recovery_detected() {
        let mut det = DetectionLossDetector;
        let seen = rec(0, 1.0, true, Mode::Landing);
        let missed = rec(1, 1.0, false, Mode::Landing);
        assert_eq!(det.check(&seen, &missed), Some(EventKind::DetectionLost));
        assert_eq!(det.check(&missed, &seen), Some(EventKind::DetectionRecovered));
        // first sighting is an acquisition, not a recovery
        let exploring = rec(0, 1.0, false, Mode::Exploring);
        assert_eq!(det.check(&exploring, &seen), None);
    }

    #[test]
    fn touchdown_fires_once() {
        let mut det = TouchdownDetector::new(0.1);
        let above = rec(0, 0.2, true, Mode::Landing);
        let below = rec(1, 0.05, true, Mode::Landing);
        assert_eq!(det.check(&above, &below), Some(EventKind::Touchdown));
        assert!(det.check(&above, &below).is_none());
    }

    #[test]
    fn scan_reports_cycle_zero_acquisition() {
        let log = FlightLog {
            scenario: "T".into(),
            records: vec![rec(0, 1.0, true, Mode::Landing), rec(1, 0.0, true, Mode::Landing)],
        };
        let events = scan(&log, &mut standard_detectors(0.1));
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(kinds, vec![EventKind::Acquired, EventKind::Touchdown]);
        assert_eq!(events[1].cycle, 1);
    }

    #[test]
    fn scan_of_empty_log_is_empty() {
        let log = FlightLog { scenario: "T".into(), records: vec![] };
        assert!(scan(&log, &mut standard_detectors(0.1)).is_empty());
    }
}
