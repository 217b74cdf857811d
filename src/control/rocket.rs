use std::sync::Arc;

use crate::trajectory_system::aerodynamics::{circle_area, DragProfile};

use super::parachute::ParachuteModel;

/// Descending vehicle. The parachute is shared so the engine reads the same instance
/// in every phase.
#[derive(Debug, Clone)]
pub struct RocketModel {
    pub mass: f64,
    pub diameter: f64,
    pub drag_coefficient: f64,
    pub parachute: Arc<ParachuteModel>,
}

impl RocketModel {
    pub fn new(
        mass: f64,
        diameter: f64,
        drag_coefficient: f64,
        parachute: Arc<ParachuteModel>,
    ) -> Self {
        RocketModel {
            mass,
            diameter,
            drag_coefficient,
            parachute,
        }
    }

    pub fn body_area(&self) -> f64 {
        circle_area(self.diameter)
    }

    /// Drag of the bare body, used before the canopy opens.
    pub fn body_drag(&self) -> DragProfile {
        DragProfile::new(self.drag_coefficient, self.body_area())
    }
}
