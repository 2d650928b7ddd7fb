//! # Slotwise Domain
//!
//! Business domain types and models for Slotwise.
//!
//! This crate contains:
//! - Domain data types (Intent, Slot, ProposedSlot, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//! - The generic date/time grammar used by the heuristic parser
//!
//! ## Architecture
//! - No dependencies on other Slotwise crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export date grammar utilities
pub use utils::date_grammar::{extract_date_candidate, DateCandidate};
