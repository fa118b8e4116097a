use std::marker::PhantomData;

use super::detection::{DetectionResult, Point2D};

// ---------------------------------------------------------------------------
// Detector adapter
// ---------------------------------------------------------------------------

/// Output of one detector call: the result the controller consumes, plus
/// whatever annotated frame the detector drew. The controller never looks
/// inside `annotated`.
#[derive(Debug, Clone)]
pub struct Detection<A> {
    pub result: DetectionResult,
    pub annotated: A,
}

/// Maps a raw frame to a detection result.
///
/// Color segmentation, learned detectors and text recognition are all
/// separate implementations of this trait, chosen when the pipeline is
/// built.
pub trait MarkerDetector {
    type Frame;
    type Annotated;

    fn detect(&mut self, frame: Self::Frame) -> Detection<Self::Annotated>;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

// ---------------------------------------------------------------------------
// Replay detector: recorded marker centers, one per frame
// ---------------------------------------------------------------------------

/// Replays a recorded sequence of detections. Frames are ignored; the
/// annotation is the index of the replayed sample. Past the end of the
/// recording every frame reports no marker.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    image_center: Point2D,
    samples: Vec<Option<Point2D>>,
    cursor: usize,
}

impl ReplayDetector {
    pub fn new(image_center: Point2D, samples: Vec<Option<Point2D>>) -> Self {
        Self { image_center, samples, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.cursor)
    }
}

impl MarkerDetector for ReplayDetector {
    type Frame = ();
    type Annotated = usize;

    fn detect(&mut self, _frame: ()) -> Detection<usize> {
        let idx = self.cursor;
        let marker = self.samples.get(idx).copied().flatten();
        self.cursor += 1;
        Detection {
            result: DetectionResult { image_center: self.image_center, marker_center: marker },
            annotated: idx,
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}

// ---------------------------------------------------------------------------
// Closure detector
// ---------------------------------------------------------------------------

/// Wraps a closure so an external pipeline plugs in without its own type.
pub struct FnDetector<Fr, A, F> {
    name: String,
    detect: F,
    _io: PhantomData<fn(Fr) -> A>,
}

impl<Fr, A, F> FnDetector<Fr, A, F>
where
    F: FnMut(Fr) -> Detection<A>,
{
    pub fn new(name: impl Into<String>, detect: F) -> Self {
        Self { name: name.into(), detect, _io: PhantomData }
    }
}

impl<Fr, A, F> MarkerDetector for FnDetector<Fr, A, F>
where
    F: FnMut(Fr) -> Detection<A>,
{
    type Frame = Fr;
    type Annotated = A;

    fn detect(&mut self, frame: Fr) -> Detection<A> {
        (self.detect)(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
