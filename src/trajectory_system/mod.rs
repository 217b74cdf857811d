pub mod aerodynamics;
pub mod drift;
pub mod engine;
pub mod kinematics;
pub mod phase;
