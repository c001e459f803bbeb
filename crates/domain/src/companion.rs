use serde::{Deserialize, Serialize};

/// Behavior state of one companion.
///
/// Created lazily at the all-false baseline, mutated only by action handlers.
/// `location` is carried for the game client and never read by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanionState {
    pub is_following: bool,
    pub is_waiting: bool,
    pub is_defending: bool,
    pub following_target: Option<String>,
    pub current_target: Option<String>,
    pub location: Option<String>,
}

impl CompanionState {
    pub fn is_baseline(&self) -> bool {
        *self == Self::default()
    }
}
