//! Action dispatch use case.
//!
//! The dispatcher is the sole authority on whether an action succeeds. It
//! maps a `Command` to a `Response` one action at a time, in input order,
//! against the companion state store it was built with.

mod handlers;

pub use handlers::{handle, Verdict};

use std::sync::Arc;

use squadlink_domain::{
    validate_response, Action, ActionKind, ActionResult, Command, CompanionId, FailureReason,
    Response, ResponseId,
};

use crate::stores::CompanionStateStore;

/// Executed type reported for actions outside the vocabulary.
pub const UNSUPPORTED_TYPE_LABEL: &str = "unknown";

/// Deterministic executor of compiled commands.
pub struct CommandDispatcher {
    store: Arc<CompanionStateStore>,
    default_companion: CompanionId,
}

impl CommandDispatcher {
    pub fn new(store: Arc<CompanionStateStore>) -> Self {
        Self {
            store,
            default_companion: CompanionId::default(),
        }
    }

    pub fn with_default_companion(mut self, companion: CompanionId) -> Self {
        self.default_companion = companion;
        self
    }

    pub fn store(&self) -> &Arc<CompanionStateStore> {
        &self.store
    }

    pub fn default_companion(&self) -> &CompanionId {
        &self.default_companion
    }

    /// Execute every action of `command` and return the checked response.
    ///
    /// Policy failures are ordinary results. An `Err` means the dispatcher
    /// produced a response that breaks its own contract.
    pub fn execute(&self, command: &Command) -> Result<Response, DispatchError> {
        let results: Vec<ActionResult> = command
            .actions
            .iter()
            .map(|action| self.execute_action(action))
            .collect();

        let response = Response::new(command.command_id.clone(), results);
        check_contract(&response)?;

        tracing::debug!(
            command_id = %command.command_id,
            actions = response.actions.len(),
            all_succeeded = response.all_succeeded(),
            "Command dispatched"
        );
        Ok(response)
    }

    /// Restore every tracked companion to the baseline.
    pub fn reset(&self) {
        self.store.reset();
        tracing::info!(companions = self.store.len(), "Companion state reset");
    }

    fn execute_action(&self, action: &Action) -> ActionResult {
        let companion = action
            .assigned_to
            .clone()
            .unwrap_or_else(|| self.default_companion.clone());
        let direction = action.spatial_direction();

        match &action.kind {
            ActionKind::Supported(action_type) => {
                let verdict = self.store.update(&companion, |state| {
                    handle(*action_type, state, action.descriptors())
                });

                match verdict {
                    Verdict::Accepted(response_id) => {
                        tracing::debug!(
                            action_id = %action.action_id,
                            action_type = %action_type,
                            companion_id = %companion,
                            "Action accepted"
                        );
                        ActionResult::accepted(
                            action.action_id.clone(),
                            action_type.as_str(),
                            companion,
                            response_id,
                            direction,
                        )
                    }
                    Verdict::Rejected(reason, response_id) => {
                        tracing::debug!(
                            action_id = %action.action_id,
                            action_type = %action_type,
                            companion_id = %companion,
                            reason = %reason,
                            "Action rejected"
                        );
                        ActionResult::rejected(
                            action.action_id.clone(),
                            action_type.as_str(),
                            companion,
                            reason,
                            response_id,
                            direction,
                        )
                    }
                }
            }
            ActionKind::Unsupported(raw) => {
                tracing::warn!(
                    action_id = %action.action_id,
                    requested_type = %raw,
                    "Unsupported action type"
                );
                ActionResult::rejected(
                    action.action_id.clone(),
                    UNSUPPORTED_TYPE_LABEL,
                    companion,
                    FailureReason::UnsupportedAction,
                    ResponseId::UnsupportedAction,
                    direction,
                )
            }
        }
    }
}

/// Check a response against the response schema and the status/reason pairing.
pub fn check_contract(response: &Response) -> Result<(), DispatchError> {
    let violation = |detail: String| DispatchError::ContractViolation {
        command_id: response.command_id.clone(),
        detail,
    };

    let value = serde_json::to_value(response).map_err(|e| violation(e.to_string()))?;
    validate_response(&value).map_err(|e| violation(e.to_string()))?;

    if let Some(bad) = response.actions.iter().find(|r| !r.is_consistent()) {
        return Err(violation(format!(
            "action {} has status={} with reason={:?}",
            bad.action_id, bad.status, bad.reason
        )));
    }
    Ok(())
}

/// Internal fault: the dispatcher broke its own output contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Response for command {command_id} violates contract: {detail}")]
    ContractViolation { command_id: String, detail: String },
}
