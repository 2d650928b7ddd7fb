//! Slot categorization.
//!
//! Partitions found slots against the originally intended window and ranks
//! the misses by temporal distance with a human-readable reason.

use chrono::Duration;
use slotwise_domain::constants::{MAX_PROPOSED_SLOTS, VERY_CLOSE_THRESHOLD_HOURS};
use slotwise_domain::{Intent, ProposedSlot, Slot};

/// Found slots split into the intended window and ranked alternatives.
#[derive(Debug, Clone, Default)]
pub struct Categorized {
    pub available: Vec<Slot>,
    pub proposed: Vec<ProposedSlot>,
}

/// Split `slots` into available (start inside `[intent.start, intent.end]`,
/// inclusive) and proposed (everything else, annotated, sorted ascending by
/// distance, capped at ten).
pub fn categorize(slots: &[Slot], intent: &Intent) -> Categorized {
    let window_start = intent.start_time.to_utc();
    let window_end = intent.end_time.to_utc();

    let mut available = Vec::new();
    let mut proposed = Vec::new();

    for slot in slots {
        if slot.start >= window_start && slot.start <= window_end {
            available.push(*slot);
        } else {
            let delta = slot.start.signed_duration_since(window_start);
            proposed.push(ProposedSlot {
                slot: *slot,
                distance_minutes: delta.num_seconds().abs() as f64 / 60.0,
                reason: proximity_reason(delta),
            });
        }
    }

    proposed.sort_by(|a, b| {
        a.distance_minutes
            .partial_cmp(&b.distance_minutes)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    proposed.truncate(MAX_PROPOSED_SLOTS);

    Categorized { available, proposed }
}

/// Reason bucket from the signed offset between a slot start and the
/// intended start. Ordered guard list, nearest bucket first.
pub fn proximity_reason(delta: Duration) -> String {
    let hours = delta.num_seconds() as f64 / 3600.0;

    if hours.abs() < VERY_CLOSE_THRESHOLD_HOURS {
        return "very close to requested time".to_string();
    }
    if hours > 0.0 && hours < 24.0 {
        return "same day, later time".to_string();
    }
    if hours < 0.0 && hours > -24.0 {
        return "same day, earlier time".to_string();
    }
    if hours >= 24.0 {
        let days = (hours / 24.0).floor() as i64;
        return format!("{days} days later");
    }
    let days = (hours.abs() / 24.0).floor() as i64;
    format!("{days} days earlier")
}
