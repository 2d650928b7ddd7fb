//! Infrastructure adapters for the availability engine.
//!
//! Everything behind the core's port traits lives here: the HTTP transport
//! wrapper, the language-understanding client, the slot-source client,
//! configuration loading, and the tracing event sink.

pub mod calcom;
pub mod config;
pub mod http;
pub mod llm;
pub mod observability;

pub use calcom::CalComClient;
pub use http::HttpClient;
pub use llm::OpenAiIntentClient;
pub use observability::TracingSink;
