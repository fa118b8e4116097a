//! Guidance and control core for a vision-aided vertical landing.
//!
//! Each control cycle the caller hands a [`vision::DetectionResult`] and an
//! altitude to a [`gnc::LandingController`] and gets back a
//! `[roll, pitch, yaw, throttle]` action plus the controller mode.

pub mod config;
pub mod error;
pub mod gnc;
pub mod io;
pub mod sim;
pub mod vision;

pub use config::ControllerConfig;
pub use error::{ControlError, ControlResult};
pub use gnc::{ActionVector, Command, Controller, LandingController, Mode};
pub use vision::{DetectionResult, MarkerDetector, Point2D};
