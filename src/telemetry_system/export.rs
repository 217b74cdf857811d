use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::Result;

use super::results::SimulationResults;

/// Writes the recorded series as CSV, one row per integration step.
pub fn write_time_series<W: Write>(writer: &mut W, results: &SimulationResults) -> Result<()> {
    writeln!(
        writer,
        "time,altitude,velocity,vertical_velocity,horizontal_velocity,acceleration"
    )?;

    for i in 0..results.len() {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            results.time[i],
            results.altitude[i],
            results.velocity[i],
            results.vertical_velocity[i],
            results.horizontal_velocity[i],
            results.acceleration[i],
        )?;
    }

    Ok(())
}

pub fn write_time_series_file(path: impl AsRef<Path>, results: &SimulationResults) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_time_series(&mut file, results)?;
    file.flush()?;
    Ok(())
}

/// Writes every drift trace as CSV rows of `wind_speed,altitude,offset`.
pub fn write_drift<W: Write>(writer: &mut W, results: &SimulationResults) -> Result<()> {
    writeln!(writer, "wind_speed,altitude,offset")?;

    for (wind, trace) in &results.drift {
        for point in trace {
            writeln!(writer, "{},{:.4},{:.4}", wind, point.altitude, point.offset)?;
        }
    }

    Ok(())
}

pub fn write_drift_file(path: impl AsRef<Path>, results: &SimulationResults) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_drift(&mut file, results)?;
    file.flush()?;
    Ok(())
}

/// Writes the whole result bundle as pretty JSON.
pub fn write_results_json<W: Write>(writer: &mut W, results: &SimulationResults) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, results)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_results_json_file(path: impl AsRef<Path>, results: &SimulationResults) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_results_json(&mut file, results)?;
    file.flush()?;
    Ok(())
}
