use serde::Serialize;

use crate::gnc::{ActionVector, Mode};

/// What happened on one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleRecord {
    pub cycle: usize,
    pub altitude: f64,
    pub marker_seen: bool,
    pub mode: Mode,
    pub action: ActionVector,
    pub overridden: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightLog {
    pub scenario: String,
    pub records: Vec<CycleRecord>,
}

impl FlightLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CycleRecord> {
        self.records.last()
    }

    /// First cycle that ran in landing mode.
    pub fn first_acquisition(&self) -> Option<usize> {
        self.records.iter().find(|r| r.mode == Mode::Landing).map(|r| r.cycle)
    }

    pub fn cycles_in(&self, mode: Mode) -> usize {
        self.records.iter().filter(|r| r.mode == mode).count()
    }
}
