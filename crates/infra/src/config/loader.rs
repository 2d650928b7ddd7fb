//! Configuration loader
//!
//! Loads engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SLOTWISE_LLM_API_KEY`: language service API key (required)
//! - `SLOTWISE_LLM_API_URL`: chat-completions endpoint (optional)
//! - `SLOTWISE_LLM_MODEL`: model name (optional)
//! - `SLOTWISE_LLM_TIMEOUT_SECS`: per-request bound in seconds (optional)
//! - `SLOTWISE_SLOT_SOURCE_API_KEY`: slot source API key (required)
//! - `SLOTWISE_SLOT_SOURCE_URL`: slot source base URL (optional)
//! - `SLOTWISE_SLOT_SOURCE_TIMEOUT_SECS`: per-query bound in seconds (optional)
//! - `SLOTWISE_MIN_PRIMARY_CONFIDENCE`: primary-parse acceptance threshold (optional)

use std::path::{Path, PathBuf};

use slotwise_domain::{EngineConfig, LlmConfig, Result, SlotSourceConfig, SlotwiseError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<EngineConfig> {
    // Pick up a local .env first so both sources see it.
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the two API keys are required; everything else falls back to the
/// defaults in `EngineConfig`.
///
/// # Errors
/// Returns `SlotwiseError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<EngineConfig> {
    let defaults = EngineConfig::default();

    let llm_api_key = env_var("SLOTWISE_LLM_API_KEY")?;
    let llm_api_url = env_or("SLOTWISE_LLM_API_URL", defaults.llm.api_url);
    let llm_model = env_or("SLOTWISE_LLM_MODEL", defaults.llm.model);
    let llm_timeout_secs = env_parse("SLOTWISE_LLM_TIMEOUT_SECS", defaults.llm.timeout_secs)?;

    let slot_api_key = env_var("SLOTWISE_SLOT_SOURCE_API_KEY")?;
    let slot_base_url = env_or("SLOTWISE_SLOT_SOURCE_URL", defaults.slot_source.base_url);
    let slot_timeout_secs =
        env_parse("SLOTWISE_SLOT_SOURCE_TIMEOUT_SECS", defaults.slot_source.timeout_secs)?;

    let min_primary_confidence =
        env_parse("SLOTWISE_MIN_PRIMARY_CONFIDENCE", defaults.min_primary_confidence)?;
    if !(0.0..=1.0).contains(&min_primary_confidence) {
        return Err(SlotwiseError::Config(format!(
            "SLOTWISE_MIN_PRIMARY_CONFIDENCE must be within 0..=1, got {min_primary_confidence}"
        )));
    }

    Ok(EngineConfig {
        llm: LlmConfig {
            api_url: llm_api_url,
            api_key: llm_api_key,
            model: llm_model,
            timeout_secs: llm_timeout_secs,
        },
        slot_source: SlotSourceConfig {
            base_url: slot_base_url,
            api_key: slot_api_key,
            timeout_secs: slot_timeout_secs,
        },
        min_primary_confidence,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<EngineConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SlotwiseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotwiseError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SlotwiseError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, with the format detected by
/// file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<EngineConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SlotwiseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, up to two parent levels, and the
/// executable's directory for `config.{json,toml}` / `slotwise.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("slotwise.json"),
            cwd.join("slotwise.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("slotwise.json"),
                exe_dir.join("slotwise.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SlotwiseError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable with a default.
fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Optional parsed environment variable with a default.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| SlotwiseError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
