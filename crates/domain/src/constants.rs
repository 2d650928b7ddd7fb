//! Domain constants
//!
//! Centralized location for the defaults, bounds, and policy values used by
//! the availability resolution engine.

// Request defaults and bounds
pub const DEFAULT_FLEXIBILITY_HOURS: i64 = 2;
pub const MIN_FLEXIBILITY_HOURS: i64 = 0;
pub const MAX_FLEXIBILITY_HOURS: i64 = 24;
pub const DEFAULT_DURATION_MINUTES: i64 = 30;
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 180;
pub const MIN_QUERY_LENGTH: usize = 1;
pub const MAX_QUERY_LENGTH: usize = 500;
pub const MAX_REJECTED_TIMES: usize = 50;

// Intent parsing chain
pub const DEFAULT_MIN_PRIMARY_CONFIDENCE: f64 = 0.5;
pub const HEURISTIC_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.3;
pub const MIN_INTERPRETATION_CHARS: usize = 10;
pub const MAX_INTERPRETATION_CHARS: usize = 200;
pub const DEFAULT_FALLBACK_HOUR: u32 = 10;
pub const DEFAULT_INTENT_SPAN_MINUTES: i64 = 60;

// Rejected-time avoidance (fallback stages only)
pub const REJECTED_PROXIMITY_MINUTES: i64 = 30;
pub const REJECTED_SHIFT_MINUTES: i64 = 60;

// Collaborator bounds
pub const LLM_TIMEOUT_SECS: u64 = 10;
pub const SLOT_SOURCE_TIMEOUT_SECS: u64 = 5;

// Categorization
pub const MAX_PROPOSED_SLOTS: usize = 10;
pub const VERY_CLOSE_THRESHOLD_HOURS: f64 = 3.0;
