//! # SquadLink vocabulary types
//!
//! Closed vocabularies shared by the command and response contracts.
//! Pure data types: no I/O, no async, all serializable.

// Action vocabulary
mod action_type;
pub use action_type::{ActionKind, ActionType};

// Parameters
mod direction;
pub use direction::SpatialDirection;

mod priority;
pub use priority::Priority;
