//! Command contract: the structured form of one player utterance.
//!
//! A `Command` is produced by the intent compiler, never mutated afterwards,
//! and consumed once by the dispatcher. `priority` and `depends_on` are
//! carried for traceability only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::ids::CompanionId;
use crate::types::{ActionKind, ActionType, Priority, SpatialDirection};

/// Parameter key the dispatcher interprets. Every other key is carried unread.
pub const SPATIAL_DIRECTION_KEY: &str = "spatial_direction";

/// One player utterance compiled into an ordered list of actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command_id: String,
    pub actions: Vec<Action>,
    /// Original player text, carried through unchanged
    #[serde(default)]
    pub dialogue_context: String,
    /// Advisory; never branched on
    #[serde(default)]
    pub requires_clarification: bool,
}

impl Command {
    pub fn new(command_id: impl Into<String>, dialogue_context: impl Into<String>) -> Self {
        Self {
            command_id: command_id.into(),
            actions: Vec::new(),
            dialogue_context: dialogue_context.into(),
            requires_clarification: false,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_clarification(mut self, requires_clarification: bool) -> Self {
        self.requires_clarification = requires_clarification;
        self
    }
}

/// One requested companion behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action_id: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ActionTarget>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Falls back to the dispatcher's default companion when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<CompanionId>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub depends_on: Option<String>,
}

impl Action {
    pub fn new(action_id: impl Into<String>, kind: impl Into<ActionKind>) -> Self {
        Self {
            action_id: action_id.into(),
            kind: kind.into(),
            target: None,
            parameters: Map::new(),
            assigned_to: None,
            priority: Priority::default(),
            depends_on: None,
        }
    }

    pub fn with_target(mut self, target: ActionTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn with_direction(self, direction: SpatialDirection) -> Self {
        self.with_parameter(
            SPATIAL_DIRECTION_KEY,
            Value::String(direction.as_str().to_string()),
        )
    }

    pub fn assigned_to(mut self, companion: impl Into<CompanionId>) -> Self {
        self.assigned_to = Some(companion.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn depends_on(mut self, action_id: impl Into<String>) -> Self {
        self.depends_on = Some(action_id.into());
        self
    }

    /// Recognized action type, or `None` when the type is outside the vocabulary.
    pub fn action_type(&self) -> Option<ActionType> {
        self.kind.action_type()
    }

    /// `parameters.spatial_direction` when it names a known direction.
    pub fn spatial_direction(&self) -> Option<SpatialDirection> {
        self.parameters
            .get(SPATIAL_DIRECTION_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Strict read of `parameters.spatial_direction`: absent or null is
    /// `Ok(None)`, anything other than a known direction name is an error.
    pub fn checked_spatial_direction(&self) -> Result<Option<SpatialDirection>, DomainError> {
        match self.parameters.get(SPATIAL_DIRECTION_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => s.parse().map(Some),
            Some(other) => Err(DomainError::parse(format!(
                "{SPATIAL_DIRECTION_KEY} must be a string, got {other}"
            ))),
        }
    }

    /// Target descriptors, empty when no target was given.
    pub fn descriptors(&self) -> &[String] {
        self.target
            .as_ref()
            .map(|t| t.descriptors.as_slice())
            .unwrap_or(&[])
    }
}

/// Free-text description of what an action is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionTarget {
    #[serde(default)]
    pub descriptors: Vec<String>,
    #[serde(default)]
    pub category_hint: Option<String>,
}

impl ActionTarget {
    pub fn new<I, S>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            descriptors: descriptors.into_iter().map(Into::into).collect(),
            category_hint: None,
        }
    }

    pub fn with_category(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
