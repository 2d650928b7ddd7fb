//! # Slotwise Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The intent resolution chain (primary → heuristic → default)
//! - The expanding search orchestrator
//! - The slot categorizer
//! - Port/adapter interfaces (traits) for the two network collaborators
//!   and the structured-event sink
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod categorize;
pub mod engine;
pub mod events;
pub mod intent;
pub mod search;

// Re-export specific items to avoid ambiguity
pub use categorize::{categorize, proximity_reason, Categorized};
pub use engine::AvailabilityEngine;
pub use events::{EngineEvent, EventSink, NullSink};
pub use intent::ports::{IntentExtractor, IntentPrompt, RawIntent};
pub use intent::{IntentResolution, IntentResolver};
pub use search::ports::{SlotQuery, SlotSource};
pub use search::{expansion_windows, ExpandingSearch, SearchOutcome};
