use std::collections::BTreeMap;
use std::fmt;

use crate::trajectory_system::drift::landing_offsets;
use crate::trajectory_system::phase::DragSource;

use super::results::SimulationResults;

/// Scalar metrics derived from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSummary {
    pub landing_velocity: f64,
    pub flight_time: f64,
    pub reefed_drag_coefficient: Option<f64>,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub max_acceleration_g: f64,
    pub final_altitude: f64,
    pub max_altitude: f64,
    pub total_points: usize,
    pub time_range: (f64, f64),
    /// Wind speed (m/s) to horizontal drift at touchdown (m).
    pub landing_drift: BTreeMap<u32, f64>,
    /// Phase, start time and start altitude of each transition.
    pub transitions: Vec<(DragSource, f64, f64)>,
}

impl FlightSummary {
    pub fn from_results(results: &SimulationResults) -> Self {
        let max_velocity = results.velocity.iter().map(|v| v.abs()).fold(0.0, f64::max);
        let max_acceleration = results
            .acceleration
            .iter()
            .map(|a| a.abs())
            .fold(0.0, f64::max);
        let max_altitude = results
            .altitude
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let transitions = results
            .phases
            .iter()
            .map(|phase| {
                let start_altitude = results
                    .altitude
                    .get(phase.start_index)
                    .copied()
                    .unwrap_or(phase.end_altitude);
                (phase.drag_source, phase.start_time, start_altitude)
            })
            .collect();

        FlightSummary {
            landing_velocity: results.landing_velocity,
            flight_time: results.flight_time,
            reefed_drag_coefficient: results
                .reefed_drag_coefficient
                .filter(|cd| cd.is_finite()),
            max_velocity,
            max_acceleration,
            max_acceleration_g: max_acceleration / results.gravity.abs(),
            final_altitude: results.altitude.last().copied().unwrap_or(0.0),
            max_altitude: if max_altitude.is_finite() { max_altitude } else { 0.0 },
            total_points: results.len(),
            time_range: (
                results.time.first().copied().unwrap_or(0.0),
                results.time.last().copied().unwrap_or(0.0),
            ),
            landing_drift: landing_offsets(&results.drift),
            transitions,
        }
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude.abs() >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    fn phase_label(drag_source: DragSource) -> &'static str {
        match drag_source {
            DragSource::RocketBody => "Free fall",
            DragSource::ReefedCanopy => "Reefed canopy",
            DragSource::OpenCanopy => "Open canopy",
        }
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Summary ---")?;
        writeln!(f, "Landing Velocity: {:.2} m/s", self.landing_velocity)?;
        writeln!(
            f,
            "Flight Time: {} ({:.2} s)",
            Self::format_time(self.flight_time),
            self.flight_time
        )?;
        if let Some(cd) = self.reefed_drag_coefficient {
            writeln!(f, "Estimated Reefed Cd: {:.2}", cd)?;
        }
        writeln!(f, "Max Velocity: {:.2} m/s", self.max_velocity)?;
        writeln!(f, "Max Acceleration: {:.2} g", self.max_acceleration_g)?;
        writeln!(f, "Final Altitude: {}", Self::format_altitude(self.final_altitude))?;
        writeln!(f, "Max Altitude: {}", Self::format_altitude(self.max_altitude))?;
        writeln!(f, "Samples: {}", self.total_points)?;

        writeln!(f, "\n--- Phase Transitions ---")?;
        for (drag_source, time, altitude) in &self.transitions {
            writeln!(
                f,
                "{} started at {} ({})",
                Self::phase_label(*drag_source),
                Self::format_time(*time),
                Self::format_altitude(*altitude)
            )?;
        }

        writeln!(f, "\n--- Landing Drift ---")?;
        for (wind, offset) in &self.landing_drift {
            writeln!(f, "Wind {:>2} m/s: {:.1} m", wind, offset)?;
        }
        Ok(())
    }
}
