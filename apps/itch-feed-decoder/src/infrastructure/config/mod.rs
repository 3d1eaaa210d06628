//! Decoder Settings
//!
//! Configuration for the surrounding application, loaded from environment
//! variables. The decoder core itself takes everything it needs as explicit
//! parameters; only the binary reads the environment.

use std::path::PathBuf;

use crate::domain::session::SessionClassifier;

/// Settings for one feed processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Path to the raw feed file.
    pub feed_path: PathBuf,
    /// Regular-market open threshold in nanoseconds since midnight.
    pub session_open_ns: u64,
    /// Emit each record as a JSON line on stdout instead of only counting.
    pub emit_json: bool,
    /// Abort on the first record-level decode error.
    pub strict: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            feed_path: PathBuf::new(),
            session_open_ns: SessionClassifier::REGULAR_OPEN_NS,
            emit_json: false,
            strict: false,
        }
    }
}

impl FeedSettings {
    /// Create settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ITCH_FEED_PATH` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let feed_path = std::env::var("ITCH_FEED_PATH")
            .map_err(|_| ConfigError::MissingEnvVar("ITCH_FEED_PATH".to_string()))?;
        if feed_path.is_empty() {
            return Err(ConfigError::EmptyValue("ITCH_FEED_PATH".to_string()));
        }

        Ok(Self {
            feed_path: PathBuf::from(feed_path),
            session_open_ns: parse_env_u64(
                "ITCH_SESSION_OPEN_NS",
                SessionClassifier::REGULAR_OPEN_NS,
            ),
            emit_json: parse_env_bool("ITCH_EMIT_JSON", false),
            strict: parse_env_bool("ITCH_STRICT", false),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().map_or(default, |v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

// =============================================================================
// Tests
// =============================================================================
