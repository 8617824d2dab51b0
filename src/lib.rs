pub mod configuration;
pub mod domain;
pub mod errors;
pub mod reading_client;
pub mod routes;
pub mod session_store;
pub mod startup;
pub mod telemetry;
pub mod workflow;
