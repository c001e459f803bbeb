//! Closed vocabulary of companion action types.
//!
//! `ActionType` is the set of types the dispatcher has a handler for.
//! `ActionKind` is what arrives on the wire: either a recognized type or the
//! raw string of an unsupported one, so classification is total over every
//! possible `type` value.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognized action type, including the legacy aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    // Movement
    MoveTo,
    Follow,
    HoldPosition,
    TakeCover,
    Retreat,
    Regroup,
    // Combat
    Engage,
    Suppress,
    Overwatch,
    ClearArea,
    // Interaction
    PickUp,
    Interact,
    UseItemOn,
    ThrowEquipment,
    // General
    Cancel,
    // Legacy vocabulary, still accepted
    StopFollow,
    Wait,
    Attack,
    Defend,
    Assist,
    /// The compiler could not map the intent to a behavior
    Unknown,
}

impl ActionType {
    /// Every recognized type, in schema order.
    pub fn all() -> &'static [ActionType] {
        &[
            ActionType::Follow,
            ActionType::StopFollow,
            ActionType::Wait,
            ActionType::HoldPosition,
            ActionType::MoveTo,
            ActionType::TakeCover,
            ActionType::Engage,
            ActionType::Attack,
            ActionType::Suppress,
            ActionType::Overwatch,
            ActionType::ClearArea,
            ActionType::PickUp,
            ActionType::Interact,
            ActionType::UseItemOn,
            ActionType::ThrowEquipment,
            ActionType::Retreat,
            ActionType::Regroup,
            ActionType::Cancel,
            ActionType::Defend,
            ActionType::Assist,
            ActionType::Unknown,
        ]
    }

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::MoveTo => "move_to",
            ActionType::Follow => "follow",
            ActionType::HoldPosition => "hold_position",
            ActionType::TakeCover => "take_cover",
            ActionType::Retreat => "retreat",
            ActionType::Regroup => "regroup",
            ActionType::Engage => "engage",
            ActionType::Suppress => "suppress",
            ActionType::Overwatch => "overwatch",
            ActionType::ClearArea => "clear_area",
            ActionType::PickUp => "pick_up",
            ActionType::Interact => "interact",
            ActionType::UseItemOn => "use_item_on",
            ActionType::ThrowEquipment => "throw_equipment",
            ActionType::Cancel => "cancel",
            ActionType::StopFollow => "stop_follow",
            ActionType::Wait => "wait",
            ActionType::Attack => "attack",
            ActionType::Defend => "defend",
            ActionType::Assist => "assist",
            ActionType::Unknown => "unknown",
        }
    }

    /// Whether this type needs `target.descriptors` to succeed.
    pub fn requires_target(&self) -> bool {
        matches!(self, ActionType::Engage | ActionType::Attack)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown action type: {}", s)))
    }
}

/// Action `type` as received: recognized, or carried verbatim when not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Supported(ActionType),
    Unsupported(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Supported(t) => t.as_str(),
            ActionKind::Unsupported(raw) => raw,
        }
    }

    pub fn action_type(&self) -> Option<ActionType> {
        match self {
            ActionKind::Supported(t) => Some(*t),
            ActionKind::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ActionKind::Supported(_))
    }
}

impl From<ActionType> for ActionKind {
    fn from(value: ActionType) -> Self {
        ActionKind::Supported(value)
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.parse::<ActionType>() {
            Ok(t) => ActionKind::Supported(t),
            Err(_) => ActionKind::Unsupported(value),
        }
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        ActionKind::from(value.to_string())
    }
}

impl From<ActionKind> for String {
    fn from(value: ActionKind) -> Self {
        match value {
            ActionKind::Supported(t) => t.as_str().to_string(),
            ActionKind::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_types_round_trip_through_from_str() {
        for t in ActionType::all() {
            assert_eq!(t.as_str().parse::<ActionType>().unwrap(), *t);
        }
    }

    #[test]
    fn vocabulary_has_twenty_one_entries() {
        assert_eq!(ActionType::all().len(), 21);
    }

    #[test]
    fn serde_name_matches_as_str() {
        for t in ActionType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!("Follow".parse::<ActionType>().is_err());
        assert!("do_a_barrel_roll".parse::<ActionType>().is_err());
    }

    #[test]
    fn kind_keeps_unsupported_raw_value() {
        let kind: ActionKind = serde_json::from_str("\"do_a_barrel_roll\"").unwrap();
        assert_eq!(
            kind,
            ActionKind::Unsupported("do_a_barrel_roll".to_string())
        );
        assert!(!kind.is_supported());
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            "\"do_a_barrel_roll\""
        );
    }

    #[test]
    fn kind_recognizes_aliases() {
        let kind: ActionKind = serde_json::from_str("\"attack\"").unwrap();
        assert_eq!(kind.action_type(), Some(ActionType::Attack));
    }

    #[test]
    fn only_engage_family_requires_target() {
        let requiring: Vec<_> = ActionType::all()
            .iter()
            .filter(|t| t.requires_target())
            .collect();
        assert_eq!(requiring, vec![&ActionType::Engage, &ActionType::Attack]);
    }
}
