#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! ITCH Feed Decoder
//!
//! Decodes a binary, length-prefixed market-data feed (NASDAQ
//! TotalView-ITCH style) into typed domain records: order additions and
//! replacements, executions, cancellations, stock directory entries, and
//! market-maker state changes. Every timestamped order-book record is
//! partitioned into a pre-market or regular-market session.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Canonical record types and session classification
//!   - `records`: Orders, executions, cancellations, directory, market makers
//!   - `session`: Pre-market vs regular-market partitioning
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: The `RecordSink` contract for downstream consumers
//!   - `services`: The feed processing service and its summary counters
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `itch`: Frame reader, tag dispatch, field decoders, event stream
//!   - `config`: Environment-driven settings for the binary
//!   - `telemetry`: Tracing subscriber initialization
//!
//! # Data Flow
//!
//! ```text
//! bytes ──> FrameReader ──> tag dispatch ──> field decoders ──┐
//!                                                             │
//!            sink <── FeedProcessor <── SessionClassifier <───┘
//! ```
//!
//! The decode stage is strictly sequential and single-pass: later messages
//! reference identifiers introduced by earlier ones, so event order always
//! equals wire order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core record types with no wire-format dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Wire-format adapter and integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::records::{
    Cancellation, Execution, MarketMaker, Order, Record, RecordKind, Side, StockDirectoryEntry,
    Timestamp,
};
pub use domain::session::{Session, SessionClassifier};

// Application ports and services
pub use application::ports::{NullSink, RecordSink, VecSink};
pub use application::services::{ErrorPolicy, FeedProcessor, FeedSummary, ProcessorError};

// Wire-format adapter
pub use infrastructure::itch::{
    DecodeError, FeedDecoder, FeedError, FeedEvent, Frame, FrameError, FrameReader, MessageType,
    decode_message,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, FeedSettings};
