//! ITCH Feed Decoder Binary
//!
//! Reads a raw feed file sequentially, decodes it, and either counts records
//! or emits them as JSON lines on stdout. Durable storage belongs to
//! downstream consumers behind the `RecordSink` port; this binary is the
//! surrounding application driving one decode run.
//!
//! # Usage
//!
//! ```bash
//! ITCH_FEED_PATH=data/12302019.NASDAQ_ITCH50 cargo run -p itch-feed-decoder
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `ITCH_FEED_PATH`: Path to the raw feed file
//!
//! ## Optional
//! - `ITCH_SESSION_OPEN_NS`: Regular-market open threshold in nanoseconds
//!   since midnight (default: 34200000000000, i.e. 09:30:00)
//! - `ITCH_EMIT_JSON`: Emit each record as a JSON line on stdout (default: false)
//! - `ITCH_STRICT`: Abort on the first record-level decode error (default: false)
//! - `RUST_LOG`: Log level (default: info)

use std::io::Write;

use anyhow::Context;
use itch_feed_decoder::infrastructure::telemetry;
use itch_feed_decoder::{
    ErrorPolicy, FeedEvent, FeedProcessor, FeedSettings, FeedSummary, NullSink, RecordSink,
    SessionClassifier,
};

fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    let settings = FeedSettings::from_env()?;
    log_settings(&settings);

    let feed = std::fs::read(&settings.feed_path)
        .with_context(|| format!("reading feed file {}", settings.feed_path.display()))?;

    let classifier = SessionClassifier::new(settings.session_open_ns);
    let policy = if settings.strict {
        ErrorPolicy::Abort
    } else {
        ErrorPolicy::Continue
    };

    let summary = if settings.emit_json {
        let stdout = std::io::stdout().lock();
        run(&feed, classifier, policy, JsonLinesSink::new(stdout))?
    } else {
        run(&feed, classifier, policy, NullSink)?
    };

    log_summary(&summary);
    Ok(())
}

/// Drive one processing run with the given sink.
fn run<S>(
    feed: &[u8],
    classifier: SessionClassifier,
    policy: ErrorPolicy,
    sink: S,
) -> anyhow::Result<FeedSummary>
where
    S: RecordSink,
{
    let mut processor = FeedProcessor::new(sink)
        .with_classifier(classifier)
        .with_error_policy(policy);
    processor.run(feed).context("decoding feed")
}

/// Sink that writes each event as one JSON object per line.
struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    const fn new(out: W) -> Self {
        Self { out }
    }
}

/// Errors from the JSON-lines sink.
#[derive(Debug, thiserror::Error)]
enum JsonSinkError {
    /// Serializing a record failed.
    #[error("serializing record: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Writing a line failed.
    #[error("writing record: {0}")]
    Io(#[from] std::io::Error),
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    type Error = JsonSinkError;

    fn emit(&mut self, event: FeedEvent) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.out, &event)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed settings.
fn log_settings(settings: &FeedSettings) {
    tracing::info!(
        feed_path = %settings.feed_path.display(),
        session_open_ns = settings.session_open_ns,
        emit_json = settings.emit_json,
        strict = settings.strict,
        "Configuration loaded"
    );
}

/// Log the final run summary.
fn log_summary(summary: &FeedSummary) {
    tracing::info!(
        frames = summary.frames,
        records = summary.records,
        skipped = summary.skipped,
        record_errors = summary.record_errors,
        orders = summary.orders,
        executions = summary.executions,
        cancellations = summary.cancellations,
        stock_directory = summary.stock_directory,
        market_makers = summary.market_makers,
        pre_market = summary.pre_market,
        regular_market = summary.regular_market,
        "Feed decoded"
    );
}
