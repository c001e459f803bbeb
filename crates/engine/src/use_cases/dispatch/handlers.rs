//! Per-type action policy.
//!
//! `handle` is the only place companion flags change. It sees one companion's
//! state and the action's target descriptors, nothing else.

use squadlink_domain::{ActionType, CompanionState, FailureReason, ResponseId};

/// Outcome of one handler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted(ResponseId),
    Rejected(FailureReason, ResponseId),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn response_id(&self) -> ResponseId {
        match self {
            Verdict::Accepted(id) | Verdict::Rejected(_, id) => *id,
        }
    }
}

/// Apply the policy for `action_type` to `state`.
pub fn handle(
    action_type: ActionType,
    state: &mut CompanionState,
    descriptors: &[String],
) -> Verdict {
    match action_type {
        ActionType::Follow => follow(state),
        ActionType::StopFollow => stop_follow(state),
        ActionType::HoldPosition | ActionType::Wait => hold(state),
        ActionType::Engage | ActionType::Attack => engage(state, descriptors),
        ActionType::Defend => Verdict::Accepted(ResponseId::DefendAccept),
        ActionType::Assist => Verdict::Accepted(ResponseId::AssistAccept),
        ActionType::TakeCover => Verdict::Accepted(ResponseId::CoverAccept),
        ActionType::Suppress => Verdict::Accepted(ResponseId::SuppressAccept),
        ActionType::Overwatch => Verdict::Accepted(ResponseId::OverwatchAccept),
        ActionType::ClearArea => Verdict::Accepted(ResponseId::ClearAccept),
        ActionType::PickUp => Verdict::Accepted(ResponseId::PickupAccept),
        ActionType::Interact => Verdict::Accepted(ResponseId::InteractAccept),
        ActionType::UseItemOn => Verdict::Accepted(ResponseId::UseItemAccept),
        ActionType::ThrowEquipment => Verdict::Accepted(ResponseId::ThrowAccept),
        ActionType::Retreat => Verdict::Accepted(ResponseId::RetreatAccept),
        ActionType::Regroup => Verdict::Accepted(ResponseId::RegroupAccept),
        ActionType::MoveTo => Verdict::Accepted(ResponseId::MoveAccept),
        ActionType::Cancel => Verdict::Accepted(ResponseId::CancelAccept),
        ActionType::Unknown => {
            Verdict::Rejected(FailureReason::UnknownCommand, ResponseId::UnknownCommand)
        }
    }
}

// Waiting is left alone: a companion told to follow while holding keeps both flags.
fn follow(state: &mut CompanionState) -> Verdict {
    if state.is_following {
        return Verdict::Rejected(
            FailureReason::AlreadyFollowing,
            ResponseId::AlreadyFollowing,
        );
    }
    state.is_following = true;
    Verdict::Accepted(ResponseId::FollowAccept)
}

fn stop_follow(state: &mut CompanionState) -> Verdict {
    if !state.is_following {
        return Verdict::Rejected(FailureReason::NotFollowing, ResponseId::NotFollowing);
    }
    state.is_following = false;
    Verdict::Accepted(ResponseId::StopAccept)
}

fn hold(state: &mut CompanionState) -> Verdict {
    state.is_waiting = true;
    state.is_following = false;
    Verdict::Accepted(ResponseId::HoldAccept)
}

fn engage(state: &mut CompanionState, descriptors: &[String]) -> Verdict {
    if descriptors.is_empty() {
        return Verdict::Rejected(FailureReason::NoTarget, ResponseId::NoTarget);
    }
    state.current_target = Some(descriptors.join(" "));
    state.is_waiting = false;
    Verdict::Accepted(ResponseId::EngageAccept)
}
