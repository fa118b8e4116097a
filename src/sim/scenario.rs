use crate::vision::{DetectionResult, Point2D, ReplayDetector};

// ---------------------------------------------------------------------------
// Scripted flight: one step per control cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioStep {
    pub altitude: f64,
    pub marker: Option<Point2D>,
    pub override_signal: bool, // operator asked for emergency landing this cycle
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub image_center: Point2D,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Detector replaying this scenario's marker track.
    pub fn detector(&self) -> ReplayDetector {
        ReplayDetector::new(self.image_center, self.steps.iter().map(|s| s.marker).collect())
    }

    pub fn detection_at(&self, cycle: usize) -> Option<DetectionResult> {
        self.steps.get(cycle).map(|s| DetectionResult {
            image_center: self.image_center,
            marker_center: s.marker,
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario builder
// ---------------------------------------------------------------------------

/// Appends steps in flight order. The builder tracks the current altitude
/// and the marker currently in view; `track` and `lose` change what is in
/// view, `hold` and `descend_to` emit steps with the current view.
pub struct ScenarioBuilder {
    name: String,
    image_center: Point2D,
    altitude: f64,
    marker: Option<Point2D>,
    steps: Vec<ScenarioStep>,
    overrides: Vec<usize>,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_center: DetectionResult::center_of(640, 480),
            altitude: 2.0,
            marker: None,
            steps: vec![],
            overrides: vec![],
        }
    }

    pub fn image_center(mut self, center: Point2D) -> Self {
        self.image_center = center;
        self
    }

    pub fn start_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    /// Marker in view at `(x, y)` for `cycles` steps.
    pub fn track(mut self, x: f64, y: f64, cycles: usize) -> Self {
        self.marker = Some(Point2D::new(x, y));
        self.hold(cycles)
    }

    /// Marker out of view for `cycles` steps.
    pub fn lose(mut self, cycles: usize) -> Self {
        self.marker = None;
        self.hold(cycles)
    }

    /// `cycles` steps at the current altitude and view.
    pub fn hold(mut self, cycles: usize) -> Self {
        for _ in 0..cycles {
            self.push(self.altitude);
        }
        self
    }

    /// Linear altitude ramp to `target` over `cycles` steps, ending on `target`.
    pub fn descend_to(mut self, target: f64, cycles: usize) -> Self {
        let start = self.altitude;
        for i in 1..=cycles {
            let frac = i as f64 / cycles as f64;
            self.push(start + frac * (target - start));
        }
        if cycles > 0 {
            self.altitude = target;
        }
        self
    }

    /// Raise the operator override on step `cycle`.
    pub fn emergency_at(mut self, cycle: usize) -> Self {
        self.overrides.push(cycle);
        self
    }

    pub fn build(mut self) -> Scenario {
        for idx in self.overrides {
            if let Some(step) = self.steps.get_mut(idx) {
                step.override_signal = true;
            }
        }
        Scenario { name: self.name, image_center: self.image_center, steps: self.steps }
    }

    fn push(&mut self, altitude: f64) {
        self.steps.push(ScenarioStep { altitude, marker: self.marker, override_signal: false });
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const NAMES: [&str; 4] = ["acquire", "intermittent", "never-seen", "emergency"];

    pub fn by_name(name: &str) -> Option<Scenario> {
        match name {
            "acquire" => Some(acquire_and_descend()),
            "intermittent" => Some(intermittent()),
            "never-seen" => Some(never_seen()),
            "emergency" => Some(emergency()),
            _ => None,
        }
    }

    /// Search, spot the pad off-center, converge, descend to the ground.
    pub fn acquire_and_descend() -> Scenario {
        ScenarioBuilder::new("Acquire and descend")
            .start_altitude(2.0)
            .lose(10)
            .track(420.0, 330.0, 6)
            .track(370.0, 280.0, 6)
            .track(330.0, 250.0, 1)
            .descend_to(0.0, 40)
            .build()
    }

    /// Detection flickers in and out during the whole approach.
    pub fn intermittent() -> Scenario {
        let mut b = ScenarioBuilder::new("Intermittent detection").start_altitude(1.8).lose(4);
        for i in 0..6 {
            let offset = 60.0 - 10.0 * i as f64;
            b = b
                .track(320.0 + offset, 240.0 + offset, 2)
                .lose(3)
                .descend_to(1.8 - 0.3 * (i + 1) as f64, 3);
        }
        b.build()
    }

    /// Pad never comes into view.
    pub fn never_seen() -> Scenario {
        ScenarioBuilder::new("Never seen").start_altitude(2.0).lose(30).build()
    }

    /// Operator forces a descent while the controller is still correcting.
    pub fn emergency() -> Scenario {
        ScenarioBuilder::new("Emergency override")
            .start_altitude(1.6)
            .lose(3)
            .track(450.0, 120.0, 6)
            .descend_to(0.0, 30)
            .emergency_at(6)
            .build()
    }
}
