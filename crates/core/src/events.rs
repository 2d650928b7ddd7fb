//! Structured engine events.
//!
//! The engine stays pure by pushing every decision-point observation through
//! an injected sink instead of logging directly. Infrastructure provides a
//! tracing-backed sink; tests use [`NullSink`] or [`RecordingSink`].

use chrono::{DateTime, FixedOffset, Utc};
use slotwise_domain::AttemptLabel;

/// One observable decision taken during a request.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The language-understanding output passed validation.
    PrimaryAccepted { confidence: f64 },
    /// The language-understanding output was discarded (timeout, malformed
    /// JSON, schema violation, low confidence) and the chain moved on.
    PrimaryDiscarded { reason: String },
    /// The deterministic parser produced the intent.
    HeuristicResolved { interpretation: String },
    /// Nothing could be extracted; the tomorrow-morning default was used.
    DefaultResolved { interpretation: String },
    /// A fallback start collided with a rejected time and was moved.
    StartShifted { from: DateTime<FixedOffset>, to: DateTime<FixedOffset> },
    /// One expansion window is about to be queried.
    SearchAttempt { label: AttemptLabel, from: DateTime<Utc>, to: DateTime<Utc> },
    /// The slot source failed for one window; the loop advances.
    SearchAttemptFailed { label: AttemptLabel, error: String },
    /// The slot source answered for one window.
    SearchAttemptReturned { label: AttemptLabel, found: usize, rejected: usize },
    /// Every expansion window came back empty.
    SearchExhausted { attempts: usize },
}

/// Sink for engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink that drops every event. Useful default for tests.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Sink that records events in memory so tests can assert on the decision
/// path.
#[derive(Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
