//! Trading Session Classification
//!
//! Partitions timestamped records into pre-market and regular-market output
//! streams. Classification is a pure function of a record's timestamp against
//! a fixed time-of-day threshold; records of the same kind are still split by
//! session, never merged.

use serde::{Deserialize, Serialize};

use super::records::Timestamp;

/// Trading session a record falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    /// Before the regular-market open.
    PreMarket,
    /// At or after the regular-market open.
    RegularMarket,
}

impl Session {
    /// Stable lowercase name, used in logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreMarket => "pre_market",
            Self::RegularMarket => "regular_market",
        }
    }
}

/// Classifies timestamps into sessions against an explicit threshold.
///
/// The threshold is a constructor parameter rather than a module constant so
/// alternate thresholds are testable and configurable by the surrounding
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClassifier {
    open_ns: u64,
}

impl SessionClassifier {
    /// Regular-market open, 09:30:00 in nanoseconds since midnight.
    pub const REGULAR_OPEN_NS: u64 = 34_200_000_000_000;

    /// Create a classifier with a custom open threshold in nanoseconds.
    #[must_use]
    pub const fn new(open_ns: u64) -> Self {
        Self { open_ns }
    }

    /// The configured open threshold in nanoseconds since midnight.
    #[must_use]
    pub const fn open_ns(self) -> u64 {
        self.open_ns
    }

    /// Classify a timestamp. Total: every timestamp maps to a session, with
    /// the open threshold itself belonging to the regular market.
    #[must_use]
    pub const fn classify(self, timestamp: Timestamp) -> Session {
        if timestamp.as_nanos() < self.open_ns {
            Session::PreMarket
        } else {
            Session::RegularMarket
        }
    }
}

impl Default for SessionClassifier {
    fn default() -> Self {
        Self::new(Self::REGULAR_OPEN_NS)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(SessionClassifier::REGULAR_OPEN_NS - 1 => Session::PreMarket; "last pre-market nanosecond")]
    #[test_case(SessionClassifier::REGULAR_OPEN_NS => Session::RegularMarket; "open is regular market")]
    #[test_case(0 => Session::PreMarket; "midnight")]
    #[test_case(SessionClassifier::REGULAR_OPEN_NS + 1 => Session::RegularMarket; "after open")]
    fn boundary(nanos: u64) -> Session {
        SessionClassifier::default().classify(Timestamp::from_nanos(nanos))
    }

    #[test]
    fn alternate_threshold() {
        let classifier = SessionClassifier::new(1_000);
        assert_eq!(
            classifier.classify(Timestamp::from_nanos(999)),
            Session::PreMarket
        );
        assert_eq!(
            classifier.classify(Timestamp::from_nanos(1_000)),
            Session::RegularMarket
        );
    }

    #[test]
    fn session_names() {
        assert_eq!(Session::PreMarket.as_str(), "pre_market");
        assert_eq!(Session::RegularMarket.as_str(), "regular_market");
    }
}
