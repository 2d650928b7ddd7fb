//! Slot-source collaborator adapter (Cal.com style slots API)

pub mod client;
pub mod types;

pub use client::CalComClient;
