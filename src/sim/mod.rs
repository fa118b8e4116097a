pub mod event;
pub mod log;
pub mod runner;
pub mod scenario;

pub use log::{CycleRecord, FlightLog};
pub use runner::{run, run_with};
pub use scenario::{presets, Scenario, ScenarioBuilder, ScenarioStep};
