extern crate self as squadlink_domain;

pub mod types;

pub mod command;
pub mod companion;
pub mod error;
pub mod ids;
pub mod response;
pub mod schema;

pub use command::{Action, ActionTarget, Command};
pub use companion::CompanionState;
pub use error::DomainError;
pub use ids::{CompanionId, DEFAULT_COMPANION_ID};
pub use response::{ActionResult, FailureReason, Response, ResponseId, SignalType};
pub use schema::{validate_command, validate_response, SchemaViolation};
pub use types::{ActionKind, ActionType, Priority, SpatialDirection};
