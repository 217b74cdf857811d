use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_OPENING_TIME, DEFAULT_OPEN_DRAG_COEFFICIENT, DRAG_AREA_RATIO_OFFSET,
    DRAG_AREA_RATIO_SLOPE,
};
use crate::trajectory_system::aerodynamics::circle_area;

/// Hemispherical recovery parachute, optionally reefed and vented.
///
/// All derived quantities are pure functions of the five attributes. Anything that
/// depends on the reefing ratio reports `None` when the canopy is not reefable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParachuteModel {
    pub projected_diameter: f64,
    pub open_drag_coefficient: f64,
    pub reefing_ratio: Option<f64>,
    pub spill_hole_diameter: Option<f64>,
    pub opening_time: f64,
}

impl ParachuteModel {
    pub fn new(
        projected_diameter: f64,
        open_drag_coefficient: f64,
        reefing_ratio: Option<f64>,
        spill_hole_diameter: Option<f64>,
        opening_time: f64,
    ) -> Self {
        ParachuteModel {
            projected_diameter,
            open_drag_coefficient,
            reefing_ratio,
            spill_hole_diameter,
            opening_time,
        }
    }

    /// Unreefed, unvented canopy with the default Cd and opening time.
    pub fn hemispherical(projected_diameter: f64) -> Self {
        ParachuteModel::new(
            projected_diameter,
            DEFAULT_OPEN_DRAG_COEFFICIENT,
            None,
            None,
            DEFAULT_OPENING_TIME,
        )
    }

    pub fn is_reefable(&self) -> bool {
        self.reefed_drag_coefficient().is_some()
    }

    pub fn open_area(&self) -> f64 {
        self.vented_area(self.projected_diameter)
    }

    pub fn reefed_area(&self) -> Option<f64> {
        self.reefing_ratio
            .map(|ratio| self.vented_area(self.projected_diameter * ratio))
    }

    pub fn drag_area_ratio(&self) -> Option<f64> {
        self.reefing_ratio
            .map(|ratio| DRAG_AREA_RATIO_SLOPE * ratio + DRAG_AREA_RATIO_OFFSET)
    }

    /// Effective Cd of the reefed canopy referenced to its own reefed area.
    pub fn reefed_drag_coefficient(&self) -> Option<f64> {
        let reefed_area = self.reefed_area().filter(|area| *area > 0.0)?;
        let ratio = self.drag_area_ratio()?;
        Some(ratio * self.open_drag_coefficient * self.open_area() / reefed_area)
    }

    fn vented_area(&self, diameter: f64) -> f64 {
        let hole = self.spill_hole_diameter.unwrap_or(0.0);
        (circle_area(diameter) - circle_area(hole)).max(0.0)
    }
}
