use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Companion every action falls back to when `assigned_to` is absent.
pub const DEFAULT_COMPANION_ID: &str = "companion_01";

/// Identifier of an NPC companion whose behavior state is tracked.
///
/// Companion ids are opaque caller-assigned strings, not generated handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanionId(String);

impl CompanionId {
    /// Create a companion id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::validation("Companion id cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for CompanionId {
    fn default() -> Self {
        Self(DEFAULT_COMPANION_ID.to_string())
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CompanionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_well_known_companion() {
        assert_eq!(CompanionId::default().as_str(), DEFAULT_COMPANION_ID);
    }

    #[test]
    fn new_rejects_blank_ids() {
        assert!(CompanionId::new("   ").is_err());
        assert_eq!(CompanionId::new("bravo").unwrap().as_str(), "bravo");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CompanionId::from("companion_02");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"companion_02\"");
    }
}
