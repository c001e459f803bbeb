//! Port traits for infrastructure boundaries.
//!
//! The LLM is the only external service the engine depends on, so it is the
//! only port. Everything else is a concrete type.

mod error;
mod external;

pub use error::LlmError;
pub use external::{FinishReason, LlmPort, LlmRequest, LlmResponse, TokenUsage};

#[cfg(test)]
pub use external::MockLlmPort;
