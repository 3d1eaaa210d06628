//! Tracing Initialization
//!
//! Configures structured logging for the binary. The decode pipeline itself
//! only emits `tracing` events; subscribing to them is the surrounding
//! application's concern.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `itch_feed_decoder=info`)

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any events are emitted.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "itch_feed_decoder=info"
            .parse()
            .expect("static directive 'itch_feed_decoder=info' is valid"),
    );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
