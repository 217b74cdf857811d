pub mod environment;
pub mod parachute;
pub mod parameters;
pub mod recovery_events;
pub mod rocket;
