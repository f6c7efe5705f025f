pub mod config;
pub mod error;
pub mod ingest;
pub mod scoring;
pub mod telemetry;
