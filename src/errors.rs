use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Numeric instability at t = {time:.3} s: {detail}. Try reducing time step")]
    NumericInstability { time: f64, detail: String },

    #[error("Parameter validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Simulation cancelled at t = {time:.3} s")]
    Cancelled { time: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parameter file error: {0}")]
    ParameterFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
