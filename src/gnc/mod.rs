pub mod command;
pub mod controller;
pub mod gains;
pub mod landing;
pub mod law;
pub mod memory;
pub mod throttle;

pub use command::{ActionVector, Command, Mode};
pub use controller::Controller;
pub use gains::{FixedGains, GainSchedule, Gains, InverseErrorGains};
pub use landing::LandingController;
pub use law::{position_error, proportional_action, CorrectionGate};
pub use memory::{EffectiveMarker, MarkerMemory, MarkerMemoryPolicy, MarkerSource};
pub use throttle::ThrottleProfile;
