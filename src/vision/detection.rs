use nalgebra::{Point2, Vector2};

use crate::error::{ControlError, ControlResult};

/// Pixel-space point. x grows right, y grows down.
pub type Point2D = Point2<f64>;

// ---------------------------------------------------------------------------
// Per-cycle detection result
// ---------------------------------------------------------------------------

/// What the detector saw in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    pub image_center: Point2D,
    pub marker_center: Option<Point2D>,
}

impl DetectionResult {
    pub fn found(image_center: Point2D, marker_center: Point2D) -> Self {
        Self { image_center, marker_center: Some(marker_center) }
    }

    pub fn missing(image_center: Point2D) -> Self {
        Self { image_center, marker_center: None }
    }

    /// Frame center for a `width` x `height` image, halved with integer
    /// division as camera adapters report it.
    pub fn center_of(width: u32, height: u32) -> Point2D {
        Point2D::new((width / 2) as f64, (height / 2) as f64)
    }

    /// Marker offset from the image center, if a marker was seen.
    pub fn offset(&self) -> Option<Vector2<f64>> {
        self.marker_center.map(|m| m - self.image_center)
    }

    /// Reject geometry that would poison the action vector.
    ///
    /// Out-of-frame marker centers are accepted; only non-finite
    /// coordinates are a contract violation.
    pub fn validate(&self) -> ControlResult<()> {
        if !(self.image_center.x.is_finite() && self.image_center.y.is_finite()) {
            return Err(ControlError::InvalidDetection("image center is not finite"));
        }
        if let Some(m) = self.marker_center {
            if !(m.x.is_finite() && m.y.is_finite()) {
                return Err(ControlError::InvalidDetection("marker center is not finite"));
            }
        }
        Ok(())
    }
}
