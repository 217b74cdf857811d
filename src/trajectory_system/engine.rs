use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::constants::{
    CANCEL_POLL_INTERVAL, DRIFT_TIME_STEP, LAUNCH_ANGLE, MAX_SIMULATION_TIME, TIME_STEP,
};
use crate::control::environment::Environment;
use crate::control::rocket::RocketModel;
use crate::errors::{Result, SimulationError};
use crate::telemetry_system::results::SimulationResults;
use crate::telemetry_system::telemetry::Telemetry;

use super::aerodynamics::DragProfile;
use super::drift::DriftEstimator;
use super::kinematics::{initial_horizontal_velocity, Kinematics};
use super::phase::{DragSource, Phase};

const MAX_PREALLOCATED_SAMPLES: usize = 400_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationSettings {
    pub time_step: f64,
    pub max_time: f64,
    pub drift_time_step: f64,
    /// Degrees from horizontal; 90 is a vertical flight.
    pub launch_angle: f64,
    /// Vertical velocity at the first event.
    pub initial_velocity: f64,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        IntegrationSettings {
            time_step: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
            drift_time_step: DRIFT_TIME_STEP,
            launch_angle: LAUNCH_ANGLE,
            initial_velocity: 0.0,
        }
    }
}

/// Fixed-step integrator shared by every recovery sequence.
///
/// An engine runs exactly once: `run` consumes it and returns the result bundle.
pub struct SimulationEngine<'a> {
    rocket: &'a RocketModel,
    environment: Environment,
    settings: IntegrationSettings,
    kinematics: Kinematics,
    telemetry: Telemetry,
    drift: DriftEstimator,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(
        rocket: &'a RocketModel,
        environment: Environment,
        settings: IntegrationSettings,
        first_event_altitude: f64,
    ) -> Self {
        let horizontal_velocity = initial_horizontal_velocity(
            first_event_altitude,
            environment.gravity,
            settings.launch_angle,
        );
        let capacity = ((settings.max_time / settings.time_step) as usize)
            .saturating_add(1)
            .min(MAX_PREALLOCATED_SAMPLES);

        SimulationEngine {
            rocket,
            environment,
            settings,
            kinematics: Kinematics::new(
                first_event_altitude,
                settings.initial_velocity,
                horizontal_velocity,
            ),
            telemetry: Telemetry::with_capacity(capacity),
            drift: DriftEstimator::new(
                first_event_altitude,
                settings.drift_time_step,
                settings.time_step,
            ),
            cancel_flag: None,
        }
    }

    /// Polled every few thousand steps; setting it aborts the run with `Cancelled`.
    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(cancel_flag);
        self
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn run(mut self, phases: &[Phase]) -> Result<SimulationResults> {
        if !(self.settings.time_step > 0.0) || !self.settings.time_step.is_finite() {
            return Err(SimulationError::ConfigurationError(format!(
                "time step must be positive, got {}",
                self.settings.time_step
            )));
        }

        // Every phase is resolved before the first step so a bad reefing setup fails early.
        let profiles = phases
            .iter()
            .map(|phase| phase.drag_profile(self.rocket))
            .collect::<Result<Vec<_>>>()?;

        for (phase, drag) in phases.iter().zip(profiles) {
            self.run_phase(phase, drag)?;
        }

        let landing_velocity = self.kinematics.speed()?;
        let reefed_drag_coefficient = if phases
            .iter()
            .any(|phase| phase.drag_source == DragSource::ReefedCanopy)
        {
            self.rocket.parachute.reefed_drag_coefficient()
        } else {
            None
        };

        info!(
            landing_velocity,
            flight_time = self.kinematics.time,
            steps = self.kinematics.step_count,
            "simulation complete"
        );

        Ok(self.telemetry.into_results(
            landing_velocity,
            self.kinematics.time,
            reefed_drag_coefficient,
            self.drift.into_table(),
            self.environment.gravity,
        ))
    }

    fn run_phase(&mut self, phase: &Phase, drag: DragProfile) -> Result<()> {
        debug!(
            phase = ?phase.drag_source,
            drag_coefficient = drag.drag_coefficient,
            area = drag.reference_area,
            altitude = self.kinematics.altitude,
            time = self.kinematics.time,
            "phase started"
        );
        self.telemetry
            .begin_phase(phase.drag_source, drag, &self.kinematics);

        let opening_time = self.rocket.parachute.opening_time;
        let gravity = self.environment.vertical_gravity();
        let time_step = self.settings.time_step;

        while phase.is_active(
            self.kinematics.altitude,
            self.kinematics.time,
            opening_time,
            self.settings.max_time,
        ) {
            self.check_cancelled()?;
            self.drift
                .step(self.kinematics.step_count, self.kinematics.altitude);

            let speed = self.kinematics.speed().inspect_err(|e| error!("{}", e))?;
            let specific_drag = drag.specific_drag(speed, self.rocket.mass, &self.environment);
            let acceleration = self
                .kinematics
                .calculate_acceleration(specific_drag, gravity);
            if !acceleration.is_finite() {
                let e = SimulationError::NumericInstability {
                    time: self.kinematics.time,
                    detail: "acceleration is not finite".to_string(),
                };
                error!("{}", e);
                return Err(e);
            }

            self.telemetry
                .collect_data(&self.kinematics, speed, acceleration.magnitude());
            self.kinematics.advance(acceleration, time_step);
        }

        self.telemetry.end_phase(&self.kinematics);
        if self.kinematics.time >= self.settings.max_time
            && self.kinematics.altitude > phase.end_altitude
        {
            warn!(
                phase = ?phase.drag_source,
                altitude = self.kinematics.altitude,
                max_time = self.settings.max_time,
                "phase stopped on max time before reaching its end altitude"
            );
        }
        info!(
            phase = ?phase.drag_source,
            altitude = self.kinematics.altitude,
            speed = self.kinematics.velocity.magnitude(),
            time = self.kinematics.time,
            "phase completed"
        );
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.kinematics.step_count % CANCEL_POLL_INTERVAL != 0 {
            return Ok(());
        }
        match &self.cancel_flag {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(SimulationError::Cancelled {
                time: self.kinematics.time,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::parachute::ParachuteModel;
    use approx::assert_relative_eq;

    fn test_rocket(parachute: ParachuteModel) -> RocketModel {
        RocketModel::new(20.0, 1.0, 1.5, Arc::new(parachute))
    }

    fn coarse_settings() -> IntegrationSettings {
        IntegrationSettings {
            time_step: 0.01,
            ..IntegrationSettings::default()
        }
    }

    #[test]
    fn test_open_descent_reaches_ground() {
        let rocket = test_rocket(ParachuteModel::new(3.0, 1.5, None, None, 0.0));
        let engine = SimulationEngine::new(&rocket, Environment::default(), coarse_settings(), 200.0);
        let results = engine.run(&[Phase::free_fall(), Phase::open()]).unwrap();

        assert!(*results.altitude.last().unwrap() > 0.0);
        assert!(results.altitude.last().unwrap() - 0.01 * 20.0 <= 0.0);
        assert!(results.flight_time > 0.0);
        assert_eq!(results.reefed_drag_coefficient, None);
        // Zero opening time skips free fall entirely
        assert_eq!(results.phases[0].start_index, results.phases[1].start_index);
    }

    #[test]
    fn test_series_have_equal_length() {
        let rocket = test_rocket(ParachuteModel::new(3.0, 1.5, Some(0.5), None, 1.0));
        let engine = SimulationEngine::new(&rocket, Environment::default(), coarse_settings(), 150.0);
        let results = engine
            .run(&[Phase::free_fall(), Phase::reefed(0.0)])
            .unwrap();

        let n = results.len();
        assert!(n > 0);
        assert_eq!(results.altitude.len(), n);
        assert_eq!(results.velocity.len(), n);
        assert_eq!(results.vertical_velocity.len(), n);
        assert_eq!(results.horizontal_velocity.len(), n);
        assert_eq!(results.acceleration.len(), n);
        assert_relative_eq!(results.time[0], 0.0);
        assert_relative_eq!(results.altitude[0], 150.0);
    }

    #[test]
    fn test_first_sample_is_pre_advance_state() {
        let rocket = test_rocket(ParachuteModel::hemispherical(3.0));
        let engine = SimulationEngine::new(&rocket, Environment::default(), coarse_settings(), 100.0);
        let results = engine.run(&[Phase::free_fall(), Phase::open()]).unwrap();

        assert_eq!(results.velocity[0], 0.0);
        assert_relative_eq!(results.acceleration[0], 9.81, epsilon = 1e-12);
        assert_relative_eq!(results.vertical_velocity[1], -0.0981, epsilon = 1e-12);
    }

    #[test]
    fn test_reefed_phase_rejected_before_stepping() {
        let rocket = test_rocket(ParachuteModel::hemispherical(3.0));
        let engine = SimulationEngine::new(&rocket, Environment::default(), coarse_settings(), 100.0);
        let error = engine
            .run(&[Phase::free_fall(), Phase::reefed(0.0)])
            .unwrap_err();
        assert!(matches!(error, SimulationError::ConfigurationError(_)));
    }

    #[test]
    fn test_non_positive_time_step_rejected() {
        let rocket = test_rocket(ParachuteModel::hemispherical(3.0));
        let settings = IntegrationSettings {
            time_step: 0.0,
            ..IntegrationSettings::default()
        };
        let engine = SimulationEngine::new(&rocket, Environment::default(), settings, 100.0);
        assert!(matches!(
            engine.run(&[Phase::open()]),
            Err(SimulationError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_huge_step_is_numeric_instability() {
        let rocket = RocketModel::new(0.01, 1.0, 1.5, Arc::new(ParachuteModel::hemispherical(20.0)));
        let settings = IntegrationSettings {
            time_step: 50.0,
            max_time: 1.0e9,
            ..IntegrationSettings::default()
        };
        let engine = SimulationEngine::new(&rocket, Environment::default(), settings, 1.0e7);
        let error = engine.run(&[Phase::open()]).unwrap_err();
        assert!(matches!(error, SimulationError::NumericInstability { .. }));
    }

    #[test]
    fn test_max_time_bounds_the_run() {
        let rocket = test_rocket(ParachuteModel::hemispherical(8.0));
        let settings = IntegrationSettings {
            time_step: 0.01,
            max_time: 5.0,
            ..IntegrationSettings::default()
        };
        let engine = SimulationEngine::new(&rocket, Environment::default(), settings, 5_000.0);
        let results = engine.run(&[Phase::open()]).unwrap();
        assert!(results.flight_time >= 5.0 && results.flight_time < 5.0 + 0.02);
        assert!(*results.altitude.last().unwrap() > 0.0);
    }

    #[test]
    fn test_cancel_flag_aborts() {
        let rocket = test_rocket(ParachuteModel::hemispherical(3.0));
        let flag = Arc::new(AtomicBool::new(true));
        let engine = SimulationEngine::new(&rocket, Environment::default(), coarse_settings(), 100.0)
            .with_cancel_flag(Arc::clone(&flag));
        assert!(matches!(
            engine.run(&[Phase::open()]),
            Err(SimulationError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_angled_flight_starts_with_horizontal_velocity() {
        let rocket = test_rocket(ParachuteModel::hemispherical(3.0));
        let settings = IntegrationSettings {
            launch_angle: 80.0,
            ..coarse_settings()
        };
        let engine = SimulationEngine::new(&rocket, Environment::default(), settings, 300.0);
        let expected = (2.0 * 9.81 * 300.0_f64).sqrt() / 80.0_f64.to_radians().tan();
        assert_relative_eq!(engine.kinematics().horizontal_velocity(), expected, epsilon = 1e-9);

        let results = engine.run(&[Phase::free_fall(), Phase::open()]).unwrap();
        let first = results.horizontal_velocity[0];
        let last = *results.horizontal_velocity.last().unwrap();
        assert!(first > 0.0);
        assert!(last < first && last >= 0.0);
    }
}
