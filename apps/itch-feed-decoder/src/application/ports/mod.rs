//! Port Interfaces
//!
//! Interfaces (ports) for external systems following the Hexagonal
//! Architecture pattern. The decoder's only contract with downstream
//! consumers is the ordered record stream: durable storage (delimited rows,
//! database inserts) is an adapter concern behind [`RecordSink`].

use std::convert::Infallible;

use crate::infrastructure::itch::FeedEvent;

/// Driven port for record consumers.
///
/// Implementations receive events in decode order, which equals wire order.
/// A sink error aborts the run: the feed is strictly sequential, so skipping
/// a record a consumer failed to take would silently corrupt its view.
pub trait RecordSink {
    /// Error the sink can fail with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Consume one decoded event.
    fn emit(&mut self, event: FeedEvent) -> Result<(), Self::Error>;
}

/// A sink that discards every event, for count-only runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RecordSink for NullSink {
    type Error = Infallible;

    fn emit(&mut self, _event: FeedEvent) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A sink that buffers every event in memory, for tests and small feeds.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Vec<FeedEvent>,
}

impl VecSink {
    /// Create an empty buffering sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Events received so far, in decode order.
    #[must_use]
    pub fn events(&self) -> &[FeedEvent] {
        &self.events
    }

    /// Consume the sink, returning the buffered events.
    #[must_use]
    pub fn into_events(self) -> Vec<FeedEvent> {
        self.events
    }
}

impl RecordSink for VecSink {
    type Error = Infallible;

    fn emit(&mut self, event: FeedEvent) -> Result<(), Self::Error> {
        self.events.push(event);
        Ok(())
    }
}
