//! Port interfaces for the slot-source collaborator

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use slotwise_domain::{Result, Slot};

/// One query against the slot source, covering a single expansion window.
#[derive(Debug, Clone)]
pub struct SlotQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub event_type_id: i64,
    pub duration_minutes: i64,
    pub timezone: Tz,
}

/// Trait for the slot-availability collaborator.
///
/// Implementations own transport and the 5-second per-query bound, and
/// derive each slot's end from the requested duration when the source only
/// reports starts.
#[async_trait]
pub trait SlotSource: Send + Sync {
    /// Fetch bookable slots inside the query window.
    async fn fetch_slots(&self, query: &SlotQuery) -> Result<Vec<Slot>>;
}
