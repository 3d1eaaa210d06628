//! Infrastructure layer - Adapters and external integrations.

pub mod config;
pub mod itch;
pub mod telemetry;
