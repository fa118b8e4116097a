pub mod detection;
pub mod detector;

pub use detection::{DetectionResult, Point2D};
pub use detector::{Detection, FnDetector, MarkerDetector, ReplayDetector};
