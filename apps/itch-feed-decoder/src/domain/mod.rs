//! Domain layer - Core record types and session classification.
//!
//! These types are wire-format agnostic and represent the canonical
//! internal representation of decoded feed data.

pub mod records;
pub mod session;
