//! Tracing-backed engine event sink.

use slotwise_core::events::{EngineEvent, EventSink};
use tracing::{debug, info, warn};

/// Forwards engine events to the `tracing` subscriber as structured records.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::PrimaryAccepted { confidence } => {
                info!(confidence, "primary parse accepted");
            }
            EngineEvent::PrimaryDiscarded { reason } => {
                debug!(%reason, "primary parse discarded, falling back");
            }
            EngineEvent::HeuristicResolved { interpretation } => {
                info!(%interpretation, "heuristic parser resolved the intent");
            }
            EngineEvent::DefaultResolved { interpretation } => {
                info!(%interpretation, "default intent used");
            }
            EngineEvent::StartShifted { from, to } => {
                info!(%from, %to, "fallback start collided with a rejected time, shifted");
            }
            EngineEvent::SearchAttempt { label, from, to } => {
                debug!(attempt = %label, %from, %to, "querying slot source");
            }
            EngineEvent::SearchAttemptFailed { label, error } => {
                warn!(attempt = %label, %error, "slot source attempt failed, advancing");
            }
            EngineEvent::SearchAttemptReturned { label, found, rejected } => {
                debug!(attempt = %label, found, rejected, "slot source answered");
            }
            EngineEvent::SearchExhausted { attempts } => {
                warn!(attempts, "every expansion window came back empty");
            }
        }
    }
}
