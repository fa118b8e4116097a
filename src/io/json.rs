use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::gnc::{ActionVector, Mode};
use crate::sim::event::{self, EventKind};
use crate::sim::FlightLog;

/// Summary statistics computed from a flight log.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub cycles: usize,
    pub first_acquisition: Option<usize>,
    pub cycles_landing: usize,
    pub detection_losses: usize,
    pub max_abs_roll: f64,
    pub max_abs_pitch: f64,
    pub final_throttle: f64,
    pub final_mode: Mode,
    pub override_engaged: bool,
    pub touchdown_cycle: Option<usize>,
}

impl RunSummary {
    /// Compute summary from log data. `ground_threshold` decides touchdown.
    pub fn from_log(log: &FlightLog, ground_threshold: f64) -> Self {
        let events = event::scan(log, &mut event::standard_detectors(ground_threshold));
        let detection_losses = events.iter().filter(|e| e.kind == EventKind::DetectionLost).count();
        let touchdown_cycle = events.iter().find(|e| e.kind == EventKind::Touchdown).map(|e| e.cycle);

        let last = log.last();
        RunSummary {
            scenario: log.scenario.clone(),
            cycles: log.len(),
            first_acquisition: log.first_acquisition(),
            cycles_landing: log.cycles_in(Mode::Landing),
            detection_losses,
            max_abs_roll: max_abs(log, |a| a.roll),
            max_abs_pitch: max_abs(log, |a| a.pitch),
            final_throttle: last.map_or(0.0, |r| r.action.throttle),
            final_mode: last.map_or(Mode::Exploring, |r| r.mode),
            override_engaged: log.records.iter().any(|r| r.overridden),
            touchdown_cycle,
        }
    }
}

fn max_abs(log: &FlightLog, component: impl Fn(&ActionVector) -> f64) -> f64 {
    log.records.iter().map(|r| component(&r.action).abs()).fold(0.0_f64, f64::max)
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary).map_err(io::Error::from)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path.as_ref())?;
    write_summary(&mut file, summary)
}
