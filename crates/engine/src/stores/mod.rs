//! In-memory state storage modules.
//!
//! Stores manage runtime state that lives only for the process:
//! - `CompanionStateStore` - per-companion behavior flags

pub mod companion_state;

pub use companion_state::CompanionStateStore;
