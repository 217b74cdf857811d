use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::control::environment::Environment;

pub fn circle_area(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}

/// Drag coefficient paired with the area it is referenced to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragProfile {
    pub drag_coefficient: f64,
    pub reference_area: f64,
}

impl DragProfile {
    pub fn new(drag_coefficient: f64, reference_area: f64) -> Self {
        DragProfile {
            drag_coefficient,
            reference_area,
        }
    }

    pub fn drag_area(&self) -> f64 {
        self.drag_coefficient * self.reference_area
    }

    pub fn calculate_drag(&self, speed: f64, environment: &Environment) -> f64 {
        self.calculate_dynamic_pressure(speed, environment) * self.drag_area()
    }

    /// Drag force per unit mass.
    pub fn specific_drag(&self, speed: f64, mass: f64, environment: &Environment) -> f64 {
        self.calculate_drag(speed, environment) / mass
    }

    /// Speed at which drag balances weight.
    pub fn terminal_velocity(&self, mass: f64, environment: &Environment) -> f64 {
        (2.0 * mass * environment.gravity.abs() / (environment.air_density * self.drag_area()))
            .sqrt()
    }

    fn calculate_dynamic_pressure(&self, speed: f64, environment: &Environment) -> f64 {
        0.5 * environment.air_density * speed.powi(2)
    }
}
