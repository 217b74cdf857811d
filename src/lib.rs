pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::environment::Environment;
pub use control::parachute::ParachuteModel;
pub use control::parameters::{ParameterSet, SimulationKind};
pub use control::recovery_events::{
    DualEventSimulation, RecoverySequence, RecoverySimulation, SingleEventSimulation,
};
pub use control::rocket::RocketModel;
pub use errors::{Result, SimulationError};

// Re-export commonly used items from trajectory_system
pub use trajectory_system::drift::{DriftPoint, DriftTable};
pub use trajectory_system::engine::{IntegrationSettings, SimulationEngine};
pub use trajectory_system::phase::{DragSource, Phase, TimeBound};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::results::{PhaseRecord, SimulationResults};
pub use telemetry_system::summary::FlightSummary;

// Re-export commonly used utilities
pub use utils::vector2d::Vector2D;
