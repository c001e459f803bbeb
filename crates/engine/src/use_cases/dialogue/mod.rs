//! Dialogue resolution.
//!
//! Pure lookup from `response_id` to the line the companion speaks. No model
//! call and no game state: the dispatcher has already decided the outcome.

use std::collections::HashMap;

use squadlink_domain::{Response, ResponseId};

/// Stateless response-id to dialogue table.
#[derive(Debug, Clone)]
pub struct DialogueResolver {
    lines: HashMap<String, String>,
}

impl Default for DialogueResolver {
    fn default() -> Self {
        let lines = ResponseId::all()
            .iter()
            .map(|id| (id.as_str().to_string(), default_line(*id).to_string()))
            .collect();
        Self { lines }
    }
}

impl DialogueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or add) the line for one response id.
    pub fn with_override(
        mut self,
        response_id: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        self.lines.insert(response_id.into(), line.into());
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line for `response_id`, or a visible placeholder when the id is unmapped.
    pub fn lookup(&self, response_id: &str) -> String {
        match self.lines.get(response_id) {
            Some(line) => line.clone(),
            None => {
                tracing::warn!(response_id, "Unknown response_id");
                placeholder(response_id)
            }
        }
    }

    /// One line per action result, in order.
    pub fn resolve(&self, response: &Response) -> Vec<String> {
        response
            .actions
            .iter()
            .map(|result| self.lookup(&result.response_id))
            .collect()
    }
}

pub fn placeholder(response_id: &str) -> String {
    format!("[Unknown response: {}]", response_id)
}

fn default_line(id: ResponseId) -> &'static str {
    match id {
        // Movement
        ResponseId::FollowAccept => "Right behind you.",
        ResponseId::AlreadyFollowing => "I'm already following you.",
        ResponseId::StopAccept => "Stopping here.",
        ResponseId::NotFollowing => "I'm not moving.",
        ResponseId::MoveAccept => "Moving to position.",
        ResponseId::HoldAccept => "Holding position.",
        ResponseId::RetreatAccept => "Falling back!",
        ResponseId::RegroupAccept => "On me, regroup!",
        // Combat
        ResponseId::EngageAccept => "Engaging target!",
        ResponseId::NoTarget => "I don't see a target.",
        ResponseId::SuppressAccept => "Laying down suppressing fire!",
        ResponseId::OverwatchAccept => "Eyes on the area.",
        ResponseId::CoverAccept => "Taking cover.",
        ResponseId::ClearAccept => "Clearing the area.",
        ResponseId::DefendAccept => "Defending this position.",
        // Interaction
        ResponseId::PickupAccept => "Got it.",
        ResponseId::InteractAccept => "Interacting.",
        ResponseId::UseItemAccept => "Using item.",
        ResponseId::ThrowAccept => "Throwing!",
        ResponseId::AssistAccept => "I'm helping you.",
        // General
        ResponseId::CancelAccept => "Cancelled.",
        ResponseId::UnknownCommand => "I didn't understand that command.",
        ResponseId::UnsupportedAction => "I don't know how to do that yet.",
    }
}
