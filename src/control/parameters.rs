//! Persisted parameter set: the four groups a user edits, their validation, and the
//! bridge from raw values to the simulation objects.
//!
//! The on-disk form is a JSON document:
//!
//! ```json
//! {
//!   "rocket": { "mass": 20.0, "diameter": 1.0, "drag_coefficient": 1.5 },
//!   "parachute": { "projected_diameter": 5.0, "open_Cd": 1.5, "reefing_ratio": 0.5,
//!                  "spill_hole_diameter": 1.0, "opening_time": 10.7 },
//!   "environment": { "gravity": 9.81, "air_density": 1.124 },
//!   "simulation": { "type": "Single Event", "first_altitude": 550.0, ... }
//! }
//! ```
//!
//! Missing fields and groups take their defaults.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DRAG_AREA_RATIO_OFFSET, DRAG_AREA_RATIO_SLOPE, DRIFT_TIME_STEP, LAUNCH_ANGLE,
    MAX_SIMULATION_TIME, TIME_STEP,
};
use crate::errors::{Result, SimulationError};
use crate::telemetry_system::results::SimulationResults;
use crate::trajectory_system::engine::IntegrationSettings;

use super::environment::Environment;
use super::parachute::ParachuteModel;
use super::recovery_events::{
    DualEventSimulation, RecoverySequence, RecoverySimulation, SingleEventSimulation,
};
use super::rocket::RocketModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketParameters {
    pub mass: f64,
    pub diameter: f64,
    pub drag_coefficient: f64,
}

impl Default for RocketParameters {
    fn default() -> Self {
        RocketParameters {
            mass: 20.0,
            diameter: 1.0,
            drag_coefficient: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParachuteParameters {
    pub projected_diameter: f64,
    #[serde(rename = "open_Cd")]
    pub open_cd: f64,
    /// `null` describes a canopy that cannot be reefed.
    pub reefing_ratio: Option<f64>,
    pub spill_hole_diameter: f64,
    pub opening_time: f64,
}

impl Default for ParachuteParameters {
    fn default() -> Self {
        ParachuteParameters {
            projected_diameter: 5.0,
            open_cd: 1.5,
            reefing_ratio: Some(0.5),
            spill_hole_diameter: 1.0,
            opening_time: 10.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationKind {
    #[serde(rename = "Single Event")]
    SingleEvent,
    #[serde(rename = "Dual Event")]
    DualEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    #[serde(rename = "type")]
    pub kind: SimulationKind,
    pub first_altitude: f64,
    pub second_altitude: f64,
    /// Degrees from horizontal.
    pub launch_angle: f64,
    pub time_step: f64,
    pub max_time: f64,
    pub drift_time_step: f64,
    /// Single event only; a dual event always reefs at the first event.
    pub reefed: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            kind: SimulationKind::SingleEvent,
            first_altitude: 550.0,
            second_altitude: 500.0,
            launch_angle: LAUNCH_ANGLE,
            time_step: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
            drift_time_step: DRIFT_TIME_STEP,
            reefed: true,
        }
    }
}

impl SimulationParameters {
    pub fn uses_reefing(&self) -> bool {
        match self.kind {
            SimulationKind::SingleEvent => self.reefed,
            SimulationKind::DualEvent => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub rocket: RocketParameters,
    pub parachute: ParachuteParameters,
    pub environment: Environment,
    pub simulation: SimulationParameters,
}

impl ParameterSet {
    /// Every violated constraint, in group order.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let rocket = &self.rocket;
        if rocket.mass <= 0.0 {
            errors.push("Rocket mass must be positive".to_string());
        }
        if rocket.diameter <= 0.0 {
            errors.push("Rocket diameter must be positive".to_string());
        }
        if rocket.drag_coefficient <= 0.0 {
            errors.push("Rocket drag coefficient must be positive".to_string());
        }

        let parachute = &self.parachute;
        if parachute.projected_diameter <= 0.0 {
            errors.push("Parachute diameter must be positive".to_string());
        }
        if parachute.open_cd <= 0.0 {
            errors.push("Parachute open drag coefficient must be positive".to_string());
        }
        if parachute.opening_time < 0.0 {
            errors.push("Opening time must be non-negative".to_string());
        }
        if parachute.spill_hole_diameter < 0.0 {
            errors.push("Spill hole diameter must be non-negative".to_string());
        }
        if parachute.spill_hole_diameter >= parachute.projected_diameter {
            errors.push("Spill hole diameter must be smaller than parachute diameter".to_string());
        }
        match parachute.reefing_ratio {
            Some(ratio) => {
                if !(0.0..=1.0).contains(&ratio) {
                    errors.push("Reefing ratio must be between 0 and 1".to_string());
                }
                if ratio * parachute.projected_diameter <= parachute.spill_hole_diameter {
                    errors.push(
                        "Reefed parachute diameter is smaller than spill hole diameter".to_string(),
                    );
                }
                if self.simulation.uses_reefing()
                    && DRAG_AREA_RATIO_SLOPE * ratio + DRAG_AREA_RATIO_OFFSET <= 0.0
                {
                    errors.push(format!(
                        "Reefing ratio must exceed {:.3} for a reefed descent",
                        -DRAG_AREA_RATIO_OFFSET / DRAG_AREA_RATIO_SLOPE
                    ));
                }
            }
            None if self.simulation.uses_reefing() => {
                errors.push("Reefing ratio is required for a reefed descent".to_string());
            }
            None => {}
        }

        errors.extend(self.environment.validate());

        let simulation = &self.simulation;
        if simulation.first_altitude <= 0.0 {
            errors.push("First event altitude must be positive".to_string());
        }
        if simulation.kind == SimulationKind::DualEvent {
            if simulation.second_altitude <= 0.0 {
                errors.push("Second event altitude must be positive".to_string());
            }
            if simulation.second_altitude >= simulation.first_altitude {
                errors.push(
                    "Second event altitude must be lower than first event altitude".to_string(),
                );
            }
        }
        if simulation.launch_angle <= 0.0 || simulation.launch_angle >= 180.0 {
            errors.push("Launch angle must be between 0 and 180 degrees (exclusive)".to_string());
        }
        if simulation.time_step <= 0.0 {
            errors.push("Time step must be positive".to_string());
        }
        if simulation.max_time <= 0.0 {
            errors.push("Max time must be positive".to_string());
        }
        if simulation.drift_time_step <= 0.0 {
            errors.push("Drift time step must be positive".to_string());
        }

        errors
    }

    pub fn check(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SimulationError::ValidationError(errors))
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "parameters saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parameters = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), "parameters loaded");
        Ok(parameters)
    }

    pub fn build_parachute(&self) -> ParachuteModel {
        let parachute = &self.parachute;
        ParachuteModel::new(
            parachute.projected_diameter,
            parachute.open_cd,
            parachute.reefing_ratio,
            Some(parachute.spill_hole_diameter),
            parachute.opening_time,
        )
    }

    pub fn build_rocket(&self) -> RocketModel {
        RocketModel::new(
            self.rocket.mass,
            self.rocket.diameter,
            self.rocket.drag_coefficient,
            Arc::new(self.build_parachute()),
        )
    }

    pub fn settings(&self) -> IntegrationSettings {
        IntegrationSettings {
            time_step: self.simulation.time_step,
            max_time: self.simulation.max_time,
            drift_time_step: self.simulation.drift_time_step,
            launch_angle: self.simulation.launch_angle,
            initial_velocity: 0.0,
        }
    }

    /// Validates, then builds the sequence the `type` field selects.
    pub fn build_simulation(&self) -> Result<RecoverySimulation> {
        self.check()?;
        let rocket = self.build_rocket();
        let simulation = &self.simulation;

        Ok(match simulation.kind {
            SimulationKind::SingleEvent => RecoverySimulation::SingleEvent(
                SingleEventSimulation::new(
                    rocket,
                    simulation.first_altitude,
                    simulation.reefed,
                    self.settings(),
                )
                .with_environment(self.environment),
            ),
            SimulationKind::DualEvent => RecoverySimulation::DualEvent(
                DualEventSimulation::new(
                    rocket,
                    simulation.first_altitude,
                    simulation.second_altitude,
                    self.settings(),
                )
                .with_environment(self.environment),
            ),
        })
    }

    pub fn run(&self) -> Result<SimulationResults> {
        self.build_simulation()?.simulate()
    }
}
