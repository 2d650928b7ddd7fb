//! Observability adapters

pub mod sink;

pub use sink::TracingSink;
