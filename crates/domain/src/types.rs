//! Common data types used throughout the engine

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DURATION_MINUTES, DEFAULT_FLEXIBILITY_HOURS};

/// How the resolved intent was produced by the parsing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsingMethod {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "fallback-heuristic")]
    FallbackHeuristic,
    #[serde(rename = "fallback-default")]
    FallbackDefault,
}

impl ParsingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::FallbackHeuristic => "fallback-heuristic",
            Self::FallbackDefault => "fallback-default",
        }
    }
}

/// Resolved desired time window plus confidence/method metadata.
///
/// Created once per request by the parsing chain; immutable thereafter.
/// Invariant: `end_time > start_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub interpretation: String,
    pub confidence: f64,
    pub method: ParsingMethod,
}

/// Label of one expansion window in the escalating search sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptLabel {
    #[serde(rename = "requested_range")]
    RequestedRange,
    #[serde(rename = "plus_24h")]
    Plus24h,
    #[serde(rename = "plus_7d")]
    Plus7d,
    #[serde(rename = "next_30d")]
    Next30d,
}

impl AttemptLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestedRange => "requested_range",
            Self::Plus24h => "plus_24h",
            Self::Plus7d => "plus_7d",
            Self::Next30d => "next_30d",
        }
    }
}

impl std::fmt::Display for AttemptLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One date range tried against the slot source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub label: AttemptLabel,
}

/// A concrete bookable start/end pair reported by the slot source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A found slot outside the intended window, ranked by proximity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedSlot {
    #[serde(flatten)]
    pub slot: Slot,
    pub distance_minutes: f64,
    pub reason: String,
}

/// Inbound request contract. Schema validation happens at the HTTP boundary,
/// which enforces the bounds published in [`crate::constants`]:
/// `user_query` within [`crate::constants::MIN_QUERY_LENGTH`]..=[`crate::constants::MAX_QUERY_LENGTH`]
/// chars, `flexibility_hours` within
/// [`crate::constants::MIN_FLEXIBILITY_HOURS`]..=[`crate::constants::MAX_FLEXIBILITY_HOURS`],
/// `duration_minutes` within
/// [`crate::constants::MIN_DURATION_MINUTES`]..=[`crate::constants::MAX_DURATION_MINUTES`],
/// and at most [`crate::constants::MAX_REJECTED_TIMES`] rejected times.
/// The engine trusts these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub timezone: Tz,
    pub user_query: String,
    pub event_type_id: i64,
    #[serde(default = "default_flexibility_hours")]
    pub flexibility_hours: i64,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub rejected_times: Vec<DateTime<FixedOffset>>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_flexibility_hours() -> i64 {
    DEFAULT_FLEXIBILITY_HOURS
}

fn default_duration_minutes() -> i64 {
    DEFAULT_DURATION_MINUTES
}

/// How the query text was understood, echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIntentMetadata {
    pub requested_start: DateTime<FixedOffset>,
    pub requested_end: DateTime<FixedOffset>,
    pub interpretation: String,
    pub confidence: f64,
    pub parsing_method: ParsingMethod,
}

impl From<&Intent> for ParsedIntentMetadata {
    fn from(intent: &Intent) -> Self {
        Self {
            requested_start: intent.start_time,
            requested_end: intent.end_time,
            interpretation: intent.interpretation.clone(),
            confidence: intent.confidence,
            parsing_method: intent.method,
        }
    }
}

/// The date range of the attempt that produced the returned slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attempt: AttemptLabel,
}

/// Wall-clock timings collected during one invocation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Timings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_ms: Option<u64>,
    pub cal_api_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub parsed_intent: ParsedIntentMetadata,
    pub search_range: SearchRange,
    pub timings: Timings,
}

/// Outbound result contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: Vec<Slot>,
    pub proposed: Vec<ProposedSlot>,
    pub metadata: ResponseMetadata,
}
