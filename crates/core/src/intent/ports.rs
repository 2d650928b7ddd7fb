//! Port interfaces for intent parsing

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotwise_domain::Result;

/// Everything the language-understanding collaborator is shown for one
/// request: the query, the caller's current time (zone-aware), any times the
/// caller already turned down, and an optional prompt template override.
#[derive(Debug, Clone)]
pub struct IntentPrompt {
    pub query: String,
    pub now: DateTime<Tz>,
    pub rejected_times: Vec<DateTime<FixedOffset>>,
    pub template: Option<String>,
}

/// Raw candidate extracted from the collaborator's response, before the
/// chain applies semantic validation. Timestamps stay as strings here so the
/// validator can insist on explicit UTC offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIntent {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub interpretation: String,
    pub confidence: f64,
}

/// Trait for the language-understanding collaborator.
///
/// Implementations own transport, timeouts, and extracting the single JSON
/// object from whatever the service answered. Semantic validation of the
/// candidate belongs to the resolver, not the adapter.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Submit the prompt and return the raw intent candidate.
    async fn extract(&self, prompt: &IntentPrompt) -> Result<RawIntent>;
}
