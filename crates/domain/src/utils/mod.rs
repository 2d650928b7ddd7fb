//! Domain-level utilities

pub mod date_grammar;
