use serde::{Deserialize, Serialize};

use crate::control::rocket::RocketModel;
use crate::errors::{Result, SimulationError};

use super::aerodynamics::DragProfile;

/// Where the drag of a phase comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragSource {
    RocketBody,
    ReefedCanopy,
    OpenCanopy,
}

/// Which clock bounds a phase in addition to `max_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBound {
    /// Ends once the parachute opening time has elapsed.
    OpeningTime,
    MaxTimeOnly,
}

/// One row of a recovery sequence's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub drag_source: DragSource,
    pub end_altitude: f64,
    pub time_bound: TimeBound,
}

impl Phase {
    pub fn free_fall() -> Self {
        Phase {
            drag_source: DragSource::RocketBody,
            end_altitude: 0.0,
            time_bound: TimeBound::OpeningTime,
        }
    }

    pub fn reefed(end_altitude: f64) -> Self {
        Phase {
            drag_source: DragSource::ReefedCanopy,
            end_altitude,
            time_bound: TimeBound::MaxTimeOnly,
        }
    }

    pub fn open() -> Self {
        Phase {
            drag_source: DragSource::OpenCanopy,
            end_altitude: 0.0,
            time_bound: TimeBound::MaxTimeOnly,
        }
    }

    /// Resolves the drag coefficient and area this phase flies with.
    pub fn drag_profile(&self, rocket: &RocketModel) -> Result<DragProfile> {
        let parachute = &rocket.parachute;
        match self.drag_source {
            DragSource::RocketBody => Ok(rocket.body_drag()),
            DragSource::OpenCanopy => Ok(DragProfile::new(
                parachute.open_drag_coefficient,
                parachute.open_area(),
            )),
            DragSource::ReefedCanopy => {
                match (parachute.reefed_drag_coefficient(), parachute.reefed_area()) {
                    (Some(drag_coefficient), Some(area)) => {
                        Ok(DragProfile::new(drag_coefficient, area))
                    }
                    _ => Err(SimulationError::ConfigurationError(
                        "reefed configuration invalid: parachute has no reefed area, check reefing ratio"
                            .to_string(),
                    )),
                }
            }
        }
    }

    /// Loop guard: true while the phase should keep stepping.
    pub fn is_active(&self, altitude: f64, time: f64, opening_time: f64, max_time: f64) -> bool {
        let within_time = match self.time_bound {
            TimeBound::OpeningTime => time < opening_time,
            TimeBound::MaxTimeOnly => true,
        };
        altitude > self.end_altitude && within_time && time < max_time
    }
}
