//! Intent resolution domain

pub mod heuristic;
pub mod ports;
pub mod service;

pub use ports::*;
pub use service::*;
