pub mod configuration;
pub mod request_id;
pub mod routes;
pub mod startup;
pub mod telemetry;
