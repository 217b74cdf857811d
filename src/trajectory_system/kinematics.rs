use crate::constants::HORIZONTAL_ACCELERATION_DECIMALS;
use crate::errors::{Result, SimulationError};
use crate::utils::vector2d::Vector2D;

/// Mutable descent state, advanced with explicit Euler steps.
///
/// `velocity.x` is the horizontal component and `velocity.y` the vertical one
/// (negative while descending).
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    pub time: f64,
    pub altitude: f64,
    pub velocity: Vector2D,
    pub step_count: u64,
}

impl Kinematics {
    pub fn new(altitude: f64, vertical_velocity: f64, horizontal_velocity: f64) -> Self {
        Kinematics {
            time: 0.0,
            altitude,
            velocity: Vector2D::new(horizontal_velocity, vertical_velocity),
            step_count: 0,
        }
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.velocity.y
    }

    pub fn horizontal_velocity(&self) -> f64 {
        self.velocity.x
    }

    pub fn speed(&self) -> Result<f64> {
        let speed = self.velocity.magnitude();
        if speed.is_finite() {
            Ok(speed)
        } else {
            Err(SimulationError::NumericInstability {
                time: self.time,
                detail: format!(
                    "speed is not finite (vertical {}, horizontal {})",
                    self.velocity.y, self.velocity.x
                ),
            })
        }
    }

    pub fn flight_angle(&self) -> f64 {
        self.velocity.angle()
    }

    /// Acceleration for a given drag force per unit mass.
    ///
    /// The returned `y` is the signed vertical acceleration. The returned `x` is the
    /// horizontal drag deceleration, subtracted from the horizontal velocity on advance.
    pub fn calculate_acceleration(&self, specific_drag: f64, gravity: f64) -> Vector2D {
        let angle = self.flight_angle().abs();
        let vertical = angle.sin() * specific_drag + gravity;
        let horizontal = round_to_decimals(angle.cos() * specific_drag, HORIZONTAL_ACCELERATION_DECIMALS);
        Vector2D::new(horizontal, vertical)
    }

    pub fn advance(&mut self, acceleration: Vector2D, delta_time: f64) {
        self.velocity.y += acceleration.y * delta_time;
        self.velocity.x -= acceleration.x * delta_time;
        self.altitude += self.velocity.y * delta_time;
        self.time += delta_time;
        self.step_count += 1;
    }
}

/// Horizontal speed at the first event, assuming an undamped fall from apogee and a
/// trajectory inclined at `launch_angle` degrees.
pub fn initial_horizontal_velocity(altitude: f64, gravity: f64, launch_angle: f64) -> f64 {
    if launch_angle == 90.0 {
        return 0.0;
    }
    let vertical = (2.0 * gravity.abs() * altitude).sqrt();
    vertical / launch_angle.to_radians().tan()
}

fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
