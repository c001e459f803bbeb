//! Infrastructure - external dependency implementations.

pub mod config;
pub mod ollama;
pub mod ports;
