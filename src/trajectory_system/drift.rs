use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DRIFT_VELOCITY_STEP, MAX_DRIFT_VELOCITY};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftPoint {
    pub altitude: f64,
    pub offset: f64,
}

/// Wind speed (m/s) to drift-vs-altitude trace, in ascending wind order.
pub type DriftTable = BTreeMap<u32, Vec<DriftPoint>>;

/// Accumulates horizontal offsets for a fixed ladder of constant wind speeds.
///
/// Runs on a coarser cadence than the integrator and never feeds back into it.
#[derive(Debug, Clone)]
pub struct DriftEstimator {
    drift_time_step: f64,
    trigger_interval: u64,
    table: DriftTable,
}

impl DriftEstimator {
    pub fn new(initial_altitude: f64, drift_time_step: f64, time_step: f64) -> Self {
        let table = (0..=MAX_DRIFT_VELOCITY)
            .step_by(DRIFT_VELOCITY_STEP as usize)
            .map(|wind| {
                (
                    wind,
                    vec![DriftPoint {
                        altitude: initial_altitude,
                        offset: 0.0,
                    }],
                )
            })
            .collect();

        DriftEstimator {
            drift_time_step,
            trigger_interval: ((drift_time_step / time_step).round() as u64).max(1),
            table,
        }
    }

    pub fn trigger_interval(&self) -> u64 {
        self.trigger_interval
    }

    pub fn wind_speeds(&self) -> impl Iterator<Item = u32> + '_ {
        self.table.keys().copied()
    }

    /// Appends one point per wind speed when `step_count` falls on the drift cadence.
    pub fn step(&mut self, step_count: u64, altitude: f64) {
        if step_count % self.trigger_interval != 0 {
            return;
        }
        for (wind, trace) in self.table.iter_mut() {
            let previous = trace.last().map_or(0.0, |point| point.offset);
            trace.push(DriftPoint {
                altitude,
                offset: previous + f64::from(*wind) * self.drift_time_step,
            });
        }
    }

    pub fn table(&self) -> &DriftTable {
        &self.table
    }

    pub fn into_table(self) -> DriftTable {
        self.table
    }
}

/// Final horizontal offset reached under each wind speed.
pub fn landing_offsets(table: &DriftTable) -> BTreeMap<u32, f64> {
    table
        .iter()
        .filter_map(|(wind, trace)| trace.last().map(|point| (*wind, point.offset)))
        .collect()
}
