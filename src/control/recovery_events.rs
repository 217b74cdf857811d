use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::errors::Result;
use crate::telemetry_system::results::SimulationResults;
use crate::trajectory_system::engine::{IntegrationSettings, SimulationEngine};
use crate::trajectory_system::phase::Phase;

use super::environment::Environment;
use super::rocket::RocketModel;

/// A recovery sequence: an ordered list of phases flown by the shared engine.
pub trait RecoverySequence {
    fn phases(&self) -> Vec<Phase>;

    /// Runs the sequence once, consuming it.
    fn simulate(self) -> Result<SimulationResults>;
}

/// Inputs common to every sequence.
#[derive(Debug, Clone)]
struct Flight {
    rocket: RocketModel,
    environment: Environment,
    settings: IntegrationSettings,
    first_event_altitude: f64,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl Flight {
    fn run(&self, phases: &[Phase]) -> Result<SimulationResults> {
        let mut engine = SimulationEngine::new(
            &self.rocket,
            self.environment,
            self.settings,
            self.first_event_altitude,
        );
        if let Some(flag) = &self.cancel_flag {
            engine = engine.with_cancel_flag(Arc::clone(flag));
        }
        engine.run(phases)
    }
}

/// Free fall, then one canopy phase to the ground.
#[derive(Debug, Clone)]
pub struct SingleEventSimulation {
    flight: Flight,
    reefed: bool,
}

impl SingleEventSimulation {
    pub fn new(
        rocket: RocketModel,
        first_event_altitude: f64,
        reefed: bool,
        settings: IntegrationSettings,
    ) -> Self {
        SingleEventSimulation {
            flight: Flight {
                rocket,
                environment: Environment::default(),
                settings,
                first_event_altitude,
                cancel_flag: None,
            },
            reefed,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.flight.environment = environment;
        self
    }

    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.flight.cancel_flag = Some(cancel_flag);
        self
    }
}

impl RecoverySequence for SingleEventSimulation {
    fn phases(&self) -> Vec<Phase> {
        let canopy = if self.reefed {
            Phase::reefed(0.0)
        } else {
            Phase::open()
        };
        vec![Phase::free_fall(), canopy]
    }

    fn simulate(self) -> Result<SimulationResults> {
        self.flight.run(&self.phases())
    }
}

/// Free fall, reefed descent to the second event, then fully open to the ground.
#[derive(Debug, Clone)]
pub struct DualEventSimulation {
    flight: Flight,
    second_event_altitude: f64,
}

impl DualEventSimulation {
    pub fn new(
        rocket: RocketModel,
        first_event_altitude: f64,
        second_event_altitude: f64,
        settings: IntegrationSettings,
    ) -> Self {
        DualEventSimulation {
            flight: Flight {
                rocket,
                environment: Environment::default(),
                settings,
                first_event_altitude,
                cancel_flag: None,
            },
            second_event_altitude,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.flight.environment = environment;
        self
    }

    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.flight.cancel_flag = Some(cancel_flag);
        self
    }
}

impl RecoverySequence for DualEventSimulation {
    fn phases(&self) -> Vec<Phase> {
        vec![
            Phase::free_fall(),
            Phase::reefed(self.second_event_altitude),
            Phase::open(),
        ]
    }

    fn simulate(self) -> Result<SimulationResults> {
        self.flight.run(&self.phases())
    }
}

/// Either sequence, as selected by a parameter set.
#[derive(Debug, Clone)]
pub enum RecoverySimulation {
    SingleEvent(SingleEventSimulation),
    DualEvent(DualEventSimulation),
}

impl RecoverySequence for RecoverySimulation {
    fn phases(&self) -> Vec<Phase> {
        match self {
            RecoverySimulation::SingleEvent(simulation) => simulation.phases(),
            RecoverySimulation::DualEvent(simulation) => simulation.phases(),
        }
    }

    fn simulate(self) -> Result<SimulationResults> {
        match self {
            RecoverySimulation::SingleEvent(simulation) => simulation.simulate(),
            RecoverySimulation::DualEvent(simulation) => simulation.simulate(),
        }
    }
}
