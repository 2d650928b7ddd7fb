//! Slots API wire types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response body: a map from calendar date (`YYYY-MM-DD`) to the slot starts
/// available on that date.
#[derive(Debug, Deserialize)]
pub(crate) struct SlotsResponse {
    pub slots: BTreeMap<String, Vec<SlotEntry>>,
}

/// One bookable start. The API only reports starts; the adapter derives the
/// end from the requested duration.
#[derive(Debug, Deserialize)]
pub(crate) struct SlotEntry {
    pub time: DateTime<Utc>,
}
