use std::io::{self, Write};
use std::path::Path;

use crate::sim::FlightLog;

/// Write a flight log in CSV format.
///
/// Columns: cycle, altitude, marker_seen, mode,
///          roll, pitch, yaw, throttle, overridden
pub fn write_log<W: Write>(writer: &mut W, log: &FlightLog) -> io::Result<()> {
    writeln!(
        writer,
        "cycle,altitude,marker_seen,mode,roll,pitch,yaw,throttle,overridden"
    )?;

    for r in &log.records {
        let a = &r.action;
        writeln!(
            writer,
            "{},{:.4},{},{},{:.6},{:.6},{:.6},{:.6},{}",
            r.cycle,
            r.altitude,
            u8::from(r.marker_seen),
            r.mode,
            a.roll, a.pitch, a.yaw, a.throttle,
            u8::from(r.overridden),
        )?;
    }

    Ok(())
}

/// Write a flight log to a CSV file at the given path.
pub fn write_log_file(path: impl AsRef<Path>, log: &FlightLog) -> io::Result<()> {
    let mut file = std::fs::File::create(path.as_ref())?;
    write_log(&mut file, log)
}
