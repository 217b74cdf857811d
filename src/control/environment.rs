use serde::{Deserialize, Serialize};

use crate::constants::{AIR_DENSITY, GRAVITY};

/// Constant atmosphere the descent takes place in.
///
/// `gravity` is stored as a positive magnitude; the integrator applies it downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub gravity: f64,
    pub air_density: f64,
}

impl Environment {
    pub fn new(gravity: f64, air_density: f64) -> Self {
        Environment {
            gravity,
            air_density,
        }
    }

    /// Gravity as a signed vertical acceleration.
    pub fn vertical_gravity(&self) -> f64 {
        -self.gravity.abs()
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.air_density <= 0.0 {
            errors.push("Air density must be positive".to_string());
        }
        if self.gravity <= 0.0 {
            errors.push("Gravity must be positive".to_string());
        }
        errors
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(GRAVITY, AIR_DENSITY)
    }
}
