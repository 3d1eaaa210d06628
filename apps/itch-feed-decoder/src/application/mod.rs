//! Application layer - Use cases and port definitions.

pub mod ports;
pub mod services;
