pub mod export;
pub mod results;
pub mod summary;
pub mod telemetry;
