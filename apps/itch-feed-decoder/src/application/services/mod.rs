//! Feed Processing Service
//!
//! Drives the decode pipeline end to end: frames are decoded into events,
//! events are pushed into a [`RecordSink`], and per-kind / per-session
//! counters are collected into a [`FeedSummary`].
//!
//! # Error policy
//!
//! Frame-level errors always abort: byte alignment is unrecoverable past a
//! truncation. Record-level decode errors are never silently swallowed; they
//! are logged, counted, and either tolerated ([`ErrorPolicy::Continue`], the
//! default) or escalated to an abort ([`ErrorPolicy::Abort`]).

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::ports::RecordSink;
use crate::domain::records::RecordKind;
use crate::domain::session::{Session, SessionClassifier};
use crate::infrastructure::itch::{FeedDecoder, FeedError, FeedEvent};

/// Records between periodic progress log lines.
const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// What to do when a single record fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Drop the record, count the error, keep decoding. The default.
    #[default]
    Continue,
    /// Abort the run on the first record-level error.
    Abort,
}

/// Counters for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    /// Frames consumed, recognized or not.
    pub frames: u64,
    /// Records decoded and emitted.
    pub records: u64,
    /// Frames skipped because their tag is outside the recognized set.
    pub skipped: u64,
    /// Records dropped due to record-level decode errors.
    pub record_errors: u64,
    /// Order records (adds and replacements).
    pub orders: u64,
    /// Execution records (including anonymous trades).
    pub executions: u64,
    /// Cancellation records (partial cancels and full deletes).
    pub cancellations: u64,
    /// Stock directory entries.
    pub stock_directory: u64,
    /// Market-maker state changes.
    pub market_makers: u64,
    /// Session-partitioned records that fell before the open.
    pub pre_market: u64,
    /// Session-partitioned records at or after the open.
    pub regular_market: u64,
}

impl FeedSummary {
    fn record(&mut self, event: &FeedEvent) {
        self.records += 1;
        match event.record.kind() {
            RecordKind::Order => self.orders += 1,
            RecordKind::Execution => self.executions += 1,
            RecordKind::Cancellation => self.cancellations += 1,
            RecordKind::StockDirectory => self.stock_directory += 1,
            RecordKind::MarketMaker => self.market_makers += 1,
        }
        match event.session {
            Some(Session::PreMarket) => self.pre_market += 1,
            Some(Session::RegularMarket) => self.regular_market += 1,
            None => {}
        }
    }
}

/// Errors that abort a processing run.
#[derive(Debug, Error)]
pub enum ProcessorError<E>
where
    E: std::error::Error + 'static,
{
    /// The decode stream failed: a fatal frame error, or a record-level
    /// error under [`ErrorPolicy::Abort`].
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The sink refused a record.
    #[error("sink rejected record: {0}")]
    Sink(#[source] E),
}

/// Processes a feed buffer into a sink.
#[derive(Debug)]
pub struct FeedProcessor<S> {
    sink: S,
    classifier: SessionClassifier,
    policy: ErrorPolicy,
    progress_interval: u64,
}

impl<S: RecordSink> FeedProcessor<S> {
    /// Create a processor emitting into `sink` with default classifier and
    /// error policy.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            classifier: SessionClassifier::default(),
            policy: ErrorPolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Replace the session classifier.
    #[must_use]
    pub const fn with_classifier(mut self, classifier: SessionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the record-level error policy.
    #[must_use]
    pub const fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Consume the processor, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Decode `feed` to completion, emitting every record into the sink.
    ///
    /// Events reach the sink in wire order. On success the summary accounts
    /// for every frame: decoded, skipped, or dropped with an error.
    pub fn run(&mut self, feed: &[u8]) -> Result<FeedSummary, ProcessorError<S::Error>> {
        info!(bytes = feed.len(), "Feed processing started");
        let mut summary = FeedSummary::default();
        let mut decoder = FeedDecoder::new(feed).with_classifier(self.classifier);

        while let Some(item) = decoder.next() {
            match item {
                Ok(event) => {
                    summary.record(&event);
                    self.sink.emit(event).map_err(ProcessorError::Sink)?;

                    if summary.records % self.progress_interval == 0 {
                        info!(
                            records = summary.records,
                            skipped = decoder.skipped(),
                            errors = summary.record_errors,
                            "Feed processing progress"
                        );
                    }
                }
                Err(feed_error) if feed_error.is_fatal() => {
                    error!(error = %feed_error, "Feed truncated, aborting run");
                    return Err(ProcessorError::Feed(feed_error));
                }
                Err(feed_error) => {
                    summary.record_errors += 1;
                    warn!(error = %feed_error, "Dropping undecodable record");
                    if self.policy == ErrorPolicy::Abort {
                        return Err(ProcessorError::Feed(feed_error));
                    }
                }
            }
        }

        summary.frames = decoder.frames_read();
        summary.skipped = decoder.skipped();
        info!(
            frames = summary.frames,
            records = summary.records,
            skipped = summary.skipped,
            errors = summary.record_errors,
            pre_market = summary.pre_market,
            regular_market = summary.regular_market,
            "Feed processing finished"
        );
        Ok(summary)
    }
}

// =============================================================================
// Tests
// =============================================================================
