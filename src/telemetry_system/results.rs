use serde::{Deserialize, Serialize};

use crate::trajectory_system::drift::DriftTable;
use crate::trajectory_system::phase::DragSource;

/// One executed phase of a recovery sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub drag_source: DragSource,
    pub drag_coefficient: f64,
    pub reference_area: f64,
    /// Index of the first sample recorded in this phase.
    pub start_index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub end_altitude: f64,
}

/// Output of one `simulate()` call. Series hold pre-advance values, one entry per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub time: Vec<f64>,
    pub altitude: Vec<f64>,
    pub velocity: Vec<f64>,
    pub vertical_velocity: Vec<f64>,
    pub horizontal_velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub landing_velocity: f64,
    pub flight_time: f64,
    pub reefed_drag_coefficient: Option<f64>,
    pub drift: DriftTable,
    pub phases: Vec<PhaseRecord>,
    pub gravity: f64,
}

impl SimulationResults {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn phase(&self, drag_source: DragSource) -> Option<&PhaseRecord> {
        self.phases
            .iter()
            .find(|phase| phase.drag_source == drag_source)
    }

    /// Sample index range covered by the phase at `position` in `phases`.
    pub fn phase_range(&self, position: usize) -> Option<std::ops::Range<usize>> {
        let phase = self.phases.get(position)?;
        let end = self
            .phases
            .get(position + 1)
            .map_or(self.len(), |next| next.start_index);
        Some(phase.start_index..end)
    }
}
