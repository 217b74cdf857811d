// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const AIR_DENSITY: f64 = 1.124; // kg/m³

// Simulation Parameters
pub const TIME_STEP: f64 = 0.001; // s
pub const MAX_SIMULATION_TIME: f64 = 300.0; // s
pub const LAUNCH_ANGLE: f64 = 90.0; // degrees from horizontal
pub const CANCEL_POLL_INTERVAL: u64 = 1_000; // steps

// Drift Estimation
pub const DRIFT_TIME_STEP: f64 = 1.0; // s
pub const MAX_DRIFT_VELOCITY: u32 = 20; // m/s
pub const DRIFT_VELOCITY_STEP: u32 = 2; // m/s

// Parachute Constants
pub const DEFAULT_OPEN_DRAG_COEFFICIENT: f64 = 1.5;
pub const DEFAULT_OPENING_TIME: f64 = 8.0; // s

// Empirical drag area ratio for a reefed canopy: slope * reefing_ratio + offset
pub const DRAG_AREA_RATIO_SLOPE: f64 = 1.43;
pub const DRAG_AREA_RATIO_OFFSET: f64 = -0.12;

// Horizontal acceleration is rounded to this many decimals to keep vertical descents vertical
pub const HORIZONTAL_ACCELERATION_DECIMALS: i32 = 10;
