use std::sync::Arc;

use approx::assert_relative_eq;
use parachute_simulation::{
    errors::SimulationError, DragSource, DualEventSimulation, Environment, FlightSummary,
    IntegrationSettings, ParachuteModel, ParameterSet, RecoverySequence, RocketModel,
    SimulationKind, SimulationResults, SingleEventSimulation,
};

// Helper function to create the reference recovery configuration
fn create_test_parachute() -> Arc<ParachuteModel> {
    Arc::new(ParachuteModel::new(5.0, 1.5, Some(0.5), Some(1.0), 10.7))
}

fn create_test_rocket() -> RocketModel {
    RocketModel::new(20.0, 1.0, 1.5, create_test_parachute())
}

fn settings(time_step: f64) -> IntegrationSettings {
    IntegrationSettings {
        time_step,
        max_time: 300.0,
        ..IntegrationSettings::default()
    }
}

fn run_reference_single_event() -> SimulationResults {
    SingleEventSimulation::new(create_test_rocket(), 550.0, true, settings(0.001))
        .simulate()
        .expect("reference descent should complete")
}

fn closed_form_terminal_velocity(drag_area: f64, mass: f64, environment: &Environment) -> f64 {
    (2.0 * mass * environment.gravity / (environment.air_density * drag_area)).sqrt()
}

#[test]
fn test_reference_single_event_lands_at_reefed_terminal_velocity() {
    println!("INTEGRATION TEST: Reference single event, reefed");

    let results = run_reference_single_event();
    let parachute = create_test_parachute();
    let environment = Environment::default();

    let reefed_cd = parachute.reefed_drag_coefficient().unwrap();
    let drag_area = reefed_cd * parachute.reefed_area().unwrap();
    let expected = closed_form_terminal_velocity(drag_area, 20.0, &environment);

    println!(
        "Landing: {:.4} m/s (closed form {:.4} m/s) after {:.2} s",
        results.landing_velocity, expected, results.flight_time
    );

    assert!(results.flight_time > 0.0);
    assert!(results.flight_time < 300.0, "descent should end on the ground, not on max time");
    assert_relative_eq!(results.landing_velocity, expected, max_relative = 1e-4);
    assert_eq!(results.reefed_drag_coefficient, Some(reefed_cd));

    // Last sample is the final pre-advance state: above ground, within one step of it
    let last_altitude = *results.altitude.last().unwrap();
    assert!(last_altitude > 0.0);
    assert!(
        last_altitude <= results.landing_velocity * 0.001 + 1e-9,
        "last altitude {} should be within one step of the ground",
        last_altitude
    );
}

#[test]
fn test_parachute_phase_is_monotonic_and_converges() {
    let results = run_reference_single_event();
    let canopy = results
        .phase_range(1)
        .expect("reference run has a canopy phase");
    assert!(canopy.len() > 1000);

    let altitudes = &results.altitude[canopy.clone()];
    for pair in altitudes.windows(2) {
        assert!(pair[1] <= pair[0], "altitude rose from {} to {}", pair[0], pair[1]);
    }

    let velocities = &results.velocity[canopy];
    let early_change = (velocities[1] - velocities[0]).abs();
    let n = velocities.len();
    let late_change = (velocities[n - 1] - velocities[n - 2]).abs();
    assert!(
        late_change < early_change,
        "velocity change should shrink: early {}, late {}",
        early_change,
        late_change
    );
    assert!(late_change < 1e-9);
}

#[test]
fn test_open_single_event_uses_open_canopy() {
    let results = SingleEventSimulation::new(create_test_rocket(), 550.0, false, settings(0.001))
        .simulate()
        .unwrap();
    let parachute = create_test_parachute();
    let expected = closed_form_terminal_velocity(
        parachute.open_drag_coefficient * parachute.open_area(),
        20.0,
        &Environment::default(),
    );

    assert_eq!(results.reefed_drag_coefficient, None);
    assert_eq!(results.phases[1].drag_source, DragSource::OpenCanopy);
    assert_relative_eq!(results.landing_velocity, expected, max_relative = 1e-4);
    assert!(results.landing_velocity < run_reference_single_event().landing_velocity);
}

#[test]
fn test_dual_event_switches_canopy_at_second_event() {
    println!("INTEGRATION TEST: Dual event boundary");

    let second_event_altitude = 300.0;
    let time_step = 0.001;
    let results =
        DualEventSimulation::new(create_test_rocket(), 800.0, second_event_altitude, settings(time_step))
            .simulate()
            .expect("dual event should complete");
    let parachute = create_test_parachute();

    let sources: Vec<DragSource> = results.phases.iter().map(|p| p.drag_source).collect();
    assert_eq!(
        sources,
        vec![DragSource::RocketBody, DragSource::ReefedCanopy, DragSource::OpenCanopy]
    );

    let reefed = &results.phases[1];
    let open = &results.phases[2];
    assert_eq!(Some(reefed.drag_coefficient), parachute.reefed_drag_coefficient());
    assert_eq!(open.drag_coefficient, parachute.open_drag_coefficient);
    assert_eq!(results.reefed_drag_coefficient, parachute.reefed_drag_coefficient());

    let reefed_range = results.phase_range(1).unwrap();
    let last_reefed = results.altitude[reefed_range.end - 1];
    let first_open = results.altitude[reefed_range.end];
    println!(
        "Reefed phase ended at t={:.3}s between {:.4} m and {:.4} m",
        reefed.end_time, last_reefed, first_open
    );

    assert!(last_reefed > second_event_altitude);
    assert!(first_open <= second_event_altitude);
    let reefed_speed = results.velocity[reefed_range.end - 1];
    assert!(last_reefed - second_event_altitude <= reefed_speed * time_step * 1.01);
    assert_relative_eq!(reefed.end_time, results.time[reefed_range.end], epsilon = 1e-12);

    // Disreefing slows the descent further
    let expected = closed_form_terminal_velocity(
        parachute.open_drag_coefficient * parachute.open_area(),
        20.0,
        &Environment::default(),
    );
    assert_relative_eq!(results.landing_velocity, expected, max_relative = 1e-4);
}

#[test]
fn test_dual_event_without_reefing_fails_before_stepping() {
    let rocket = RocketModel::new(
        20.0,
        1.0,
        1.5,
        Arc::new(ParachuteModel::new(5.0, 1.5, None, Some(1.0), 10.7)),
    );
    let result = DualEventSimulation::new(rocket, 800.0, 300.0, settings(0.01)).simulate();
    match result {
        Err(SimulationError::ConfigurationError(message)) => {
            assert!(message.contains("reefed configuration invalid"));
        }
        other => panic!("expected configuration error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_drift_table_offsets() {
    let results = run_reference_single_event();
    let winds: Vec<u32> = results.drift.keys().copied().collect();
    assert_eq!(winds, (0..=20).step_by(2).collect::<Vec<u32>>());

    let calm = &results.drift[&0];
    assert!(calm.iter().all(|point| point.offset == 0.0));

    for (wind, trace) in results.drift.iter().filter(|(wind, _)| **wind > 0) {
        for pair in trace.windows(2) {
            assert!(pair[1].offset > pair[0].offset);
            assert_relative_eq!(pair[1].offset - pair[0].offset, f64::from(*wind));
        }
    }

    // Seed plus one trigger per simulated second, step zero included
    let expected_points = 1 + (results.len() + 999) / 1000;
    assert_eq!(calm.len(), expected_points);
    assert_eq!(calm[0].altitude, 550.0);
    assert_eq!(calm[1].altitude, 550.0);

    // Drift is independent of the vertical dynamics
    assert!(results.horizontal_velocity.iter().all(|v| *v == 0.0));
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let first = run_reference_single_event();
    let second = run_reference_single_event();
    assert_eq!(first, second);
}

#[test]
fn test_angled_launch_bleeds_horizontal_speed() {
    let settings = IntegrationSettings {
        launch_angle: 70.0,
        ..settings(0.001)
    };
    let results = SingleEventSimulation::new(create_test_rocket(), 550.0, true, settings)
        .simulate()
        .unwrap();

    let initial = results.horizontal_velocity[0];
    let expected = (2.0 * 9.81 * 550.0_f64).sqrt() / 70.0_f64.to_radians().tan();
    assert_relative_eq!(initial, expected, max_relative = 1e-12);

    let last = *results.horizontal_velocity.last().unwrap();
    assert!(last >= 0.0 && last < 0.01 * initial);
    assert!(results.velocity[0] > 0.0);
}

#[test]
fn test_parameter_set_round_trip_and_run() {
    let path = std::env::temp_dir().join(format!(
        "parachute_sim_params_{}.json",
        std::process::id()
    ));

    let mut parameters = ParameterSet::default();
    parameters.simulation.kind = SimulationKind::DualEvent;
    parameters.simulation.first_altitude = 800.0;
    parameters.simulation.second_altitude = 300.0;
    parameters.simulation.time_step = 0.005;
    parameters.environment = Environment::new(9.80665, 1.2);

    parameters.save(&path).expect("save should succeed");
    let loaded = ParameterSet::load(&path).expect("load should succeed");
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, parameters);
    assert!(loaded.validate().is_empty());

    let results = loaded.run().expect("loaded parameters should simulate");
    assert_eq!(results.phases.len(), 3);
    assert_relative_eq!(results.gravity, 9.80665);

    let summary = FlightSummary::from_results(&results);
    println!("{}", summary);
    assert_eq!(summary.total_points, results.len());
    assert!(summary.reefed_drag_coefficient.is_some());
    assert!(summary.max_acceleration_g > 0.0);
}

#[test]
fn test_default_parameters_reproduce_reference_run() {
    let from_parameters = ParameterSet::default().run().unwrap();
    assert_eq!(from_parameters, run_reference_single_event());
}

#[test]
fn test_invalid_parameters_report_every_violation() {
    let mut parameters = ParameterSet::default();
    parameters.rocket.mass = -1.0;
    parameters.parachute.spill_hole_diameter = 2.5;
    parameters.simulation.kind = SimulationKind::DualEvent;
    parameters.simulation.second_altitude = 550.0;

    match parameters.run() {
        Err(SimulationError::ValidationError(errors)) => {
            assert_eq!(errors.len(), 3, "{:?}", errors);
        }
        other => panic!("expected validation failure, got {:?}", other.map(|r| r.len())),
    }
}
