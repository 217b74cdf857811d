use crate::trajectory_system::aerodynamics::DragProfile;
use crate::trajectory_system::drift::DriftTable;
use crate::trajectory_system::kinematics::Kinematics;
use crate::trajectory_system::phase::DragSource;

use super::results::{PhaseRecord, SimulationResults};

/// Step-by-step recorder for the integrator.
#[derive(Debug, Default)]
pub struct Telemetry {
    time: Vec<f64>,
    altitude: Vec<f64>,
    velocity: Vec<f64>,
    vertical_velocity: Vec<f64>,
    horizontal_velocity: Vec<f64>,
    acceleration: Vec<f64>,
    phases: Vec<PhaseRecord>,
    max_velocity: f64,
    max_acceleration: f64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Telemetry {
            time: Vec::with_capacity(capacity),
            altitude: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            vertical_velocity: Vec::with_capacity(capacity),
            horizontal_velocity: Vec::with_capacity(capacity),
            acceleration: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn collect_data(&mut self, kinematics: &Kinematics, speed: f64, acceleration: f64) {
        self.time.push(kinematics.time);
        self.altitude.push(kinematics.altitude);
        self.velocity.push(speed);
        self.vertical_velocity.push(kinematics.vertical_velocity());
        self.horizontal_velocity.push(kinematics.horizontal_velocity());
        self.acceleration.push(acceleration);

        if speed > self.max_velocity {
            self.max_velocity = speed;
        }
        if acceleration > self.max_acceleration {
            self.max_acceleration = acceleration;
        }
    }

    pub fn begin_phase(&mut self, drag_source: DragSource, drag: DragProfile, kinematics: &Kinematics) {
        self.phases.push(PhaseRecord {
            drag_source,
            drag_coefficient: drag.drag_coefficient,
            reference_area: drag.reference_area,
            start_index: self.len(),
            start_time: kinematics.time,
            end_time: kinematics.time,
            end_altitude: kinematics.altitude,
        });
    }

    pub fn end_phase(&mut self, kinematics: &Kinematics) {
        if let Some(phase) = self.phases.last_mut() {
            phase.end_time = kinematics.time;
            phase.end_altitude = kinematics.altitude;
        }
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn into_results(
        self,
        landing_velocity: f64,
        flight_time: f64,
        reefed_drag_coefficient: Option<f64>,
        drift: DriftTable,
        gravity: f64,
    ) -> SimulationResults {
        SimulationResults {
            time: self.time,
            altitude: self.altitude,
            velocity: self.velocity,
            vertical_velocity: self.vertical_velocity,
            horizontal_velocity: self.horizontal_velocity,
            acceleration: self.acceleration,
            landing_velocity,
            flight_time,
            reefed_drag_coefficient,
            drift,
            phases: self.phases,
            gravity,
        }
    }
}
