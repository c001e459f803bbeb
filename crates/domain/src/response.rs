//! Response contract: the dispatcher's authoritative verdict on a command.
//!
//! One `ActionResult` per requested action, in request order. A result is a
//! failure exactly when it carries a `reason`, and its `response_id` is the
//! key the dialogue resolver looks up.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::CompanionId;
use crate::types::SpatialDirection;

/// Kind of signal a response carries. Only validation signals exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    #[default]
    Validation,
}

/// Outcome of executing a whole command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub signal_type: SignalType,
    pub command_id: String,
    pub actions: Vec<ActionResult>,
}

impl Response {
    pub fn new(command_id: impl Into<String>, actions: Vec<ActionResult>) -> Self {
        Self {
            signal_type: SignalType::Validation,
            command_id: command_id.into(),
            actions,
        }
    }

    pub fn first(&self) -> Option<&ActionResult> {
        self.actions.first()
    }

    pub fn all_succeeded(&self) -> bool {
        self.actions.iter().all(|a| a.status)
    }
}

/// Outcome of executing one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: String,
    pub action_type_executed: String,
    pub spatial_direction: Option<SpatialDirection>,
    pub status: bool,
    pub reason: Option<String>,
    pub companion_id: CompanionId,
    pub response_id: String,
}

impl ActionResult {
    pub fn accepted(
        action_id: impl Into<String>,
        action_type_executed: impl Into<String>,
        companion_id: CompanionId,
        response_id: ResponseId,
        spatial_direction: Option<SpatialDirection>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            action_type_executed: action_type_executed.into(),
            spatial_direction,
            status: true,
            reason: None,
            companion_id,
            response_id: response_id.as_str().to_string(),
        }
    }

    pub fn rejected(
        action_id: impl Into<String>,
        action_type_executed: impl Into<String>,
        companion_id: CompanionId,
        reason: FailureReason,
        response_id: ResponseId,
        spatial_direction: Option<SpatialDirection>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            action_type_executed: action_type_executed.into(),
            spatial_direction,
            status: false,
            reason: Some(reason.as_str().to_string()),
            companion_id,
            response_id: response_id.as_str().to_string(),
        }
    }

    /// `status == false` exactly when a reason is present.
    pub fn is_consistent(&self) -> bool {
        self.status == self.reason.is_none()
    }
}

/// Stable dialogue lookup key emitted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseId {
    FollowAccept,
    AlreadyFollowing,
    StopAccept,
    NotFollowing,
    MoveAccept,
    HoldAccept,
    RetreatAccept,
    RegroupAccept,
    EngageAccept,
    NoTarget,
    SuppressAccept,
    OverwatchAccept,
    CoverAccept,
    ClearAccept,
    PickupAccept,
    InteractAccept,
    UseItemAccept,
    ThrowAccept,
    DefendAccept,
    AssistAccept,
    CancelAccept,
    UnknownCommand,
    UnsupportedAction,
}

impl ResponseId {
    pub fn all() -> &'static [ResponseId] {
        &[
            ResponseId::FollowAccept,
            ResponseId::AlreadyFollowing,
            ResponseId::StopAccept,
            ResponseId::NotFollowing,
            ResponseId::MoveAccept,
            ResponseId::HoldAccept,
            ResponseId::RetreatAccept,
            ResponseId::RegroupAccept,
            ResponseId::EngageAccept,
            ResponseId::NoTarget,
            ResponseId::SuppressAccept,
            ResponseId::OverwatchAccept,
            ResponseId::CoverAccept,
            ResponseId::ClearAccept,
            ResponseId::PickupAccept,
            ResponseId::InteractAccept,
            ResponseId::UseItemAccept,
            ResponseId::ThrowAccept,
            ResponseId::DefendAccept,
            ResponseId::AssistAccept,
            ResponseId::CancelAccept,
            ResponseId::UnknownCommand,
            ResponseId::UnsupportedAction,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseId::FollowAccept => "RESP_FOLLOW_ACCEPT",
            ResponseId::AlreadyFollowing => "RESP_ALREADY_FOLLOWING",
            ResponseId::StopAccept => "RESP_STOP_ACCEPT",
            ResponseId::NotFollowing => "RESP_NOT_FOLLOWING",
            ResponseId::MoveAccept => "RESP_MOVE_ACCEPT",
            ResponseId::HoldAccept => "RESP_HOLD_ACCEPT",
            ResponseId::RetreatAccept => "RESP_RETREAT_ACCEPT",
            ResponseId::RegroupAccept => "RESP_REGROUP_ACCEPT",
            ResponseId::EngageAccept => "RESP_ENGAGE_ACCEPT",
            ResponseId::NoTarget => "RESP_NO_TARGET",
            ResponseId::SuppressAccept => "RESP_SUPPRESS_ACCEPT",
            ResponseId::OverwatchAccept => "RESP_OVERWATCH_ACCEPT",
            ResponseId::CoverAccept => "RESP_COVER_ACCEPT",
            ResponseId::ClearAccept => "RESP_CLEAR_ACCEPT",
            ResponseId::PickupAccept => "RESP_PICKUP_ACCEPT",
            ResponseId::InteractAccept => "RESP_INTERACT_ACCEPT",
            ResponseId::UseItemAccept => "RESP_USE_ITEM_ACCEPT",
            ResponseId::ThrowAccept => "RESP_THROW_ACCEPT",
            ResponseId::DefendAccept => "RESP_DEFEND_ACCEPT",
            ResponseId::AssistAccept => "RESP_ASSIST_ACCEPT",
            ResponseId::CancelAccept => "RESP_CANCEL_ACCEPT",
            ResponseId::UnknownCommand => "RESP_UNKNOWN_COMMAND",
            ResponseId::UnsupportedAction => "RESP_UNSUPPORTED_ACTION",
        }
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable cause of a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    AlreadyFollowing,
    NotFollowing,
    NoTarget,
    UnknownCommand,
    UnsupportedAction,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AlreadyFollowing => "already_following",
            FailureReason::NotFollowing => "not_following",
            FailureReason::NoTarget => "no_target",
            FailureReason::UnknownCommand => "unknown_command",
            FailureReason::UnsupportedAction => "unsupported_action",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
