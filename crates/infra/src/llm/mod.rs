//! Language-understanding collaborator adapter.
//!
//! Wraps a chat-completions style API behind the core's `IntentExtractor`
//! port. The adapter owns transport, the per-request time bound, and digging
//! the single JSON object out of the model's answer; semantic validation of
//! the candidate stays in the core resolver.

pub mod client;
pub mod prompt;
pub mod types;

pub use client::OpenAiIntentClient;
