//! Configuration structures for the engine and its collaborators

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_PRIMARY_CONFIDENCE, LLM_TIMEOUT_SECS, SLOT_SOURCE_TIMEOUT_SECS};

/// Language-understanding collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: LLM_TIMEOUT_SECS,
        }
    }
}

/// Slot-source collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSourceConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for SlotSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cal.com/v1".to_string(),
            api_key: String::new(),
            timeout_secs: SLOT_SOURCE_TIMEOUT_SECS,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub llm: LlmConfig,
    pub slot_source: SlotSourceConfig,
    /// Primary parse results below this confidence are discarded.
    pub min_primary_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            slot_source: SlotSourceConfig::default(),
            min_primary_confidence: DEFAULT_MIN_PRIMARY_CONFIDENCE,
        }
    }
}
