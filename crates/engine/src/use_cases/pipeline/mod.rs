//! Player input pipeline.
//!
//! Sequences one utterance through compile, dispatch and dialogue, timing
//! each stage. The model call is the only suspension point; dispatch and
//! dialogue are synchronous.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use squadlink_domain::{ActionResult, Command, Response};

use crate::use_cases::compile::{AttemptFailure, IntentCompiler};
use crate::use_cases::dialogue::DialogueResolver;
use crate::use_cases::dispatch::{CommandDispatcher, DispatchError};

/// Wall-clock time spent in each stage, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    pub compile_ms: u64,
    pub dispatch_ms: u64,
    pub dialogue_ms: u64,
    pub total_ms: u64,
}

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Ties together the log events of one run
    pub run_id: Uuid,
    pub input: String,
    pub command: Command,
    pub response: Response,
    /// One line per action result, same order
    pub dialogue: Vec<String>,
    pub attempts: u32,
    pub timings: StageTimings,
}

impl ExecutionReport {
    /// First action result and its line. Commands always carry at least one action.
    pub fn primary(&self) -> Option<(&ActionResult, &str)> {
        self.response
            .actions
            .first()
            .zip(self.dialogue.first().map(String::as_str))
    }
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Executed(ExecutionReport),
    /// The compiler gave up; nothing was executed
    NotUnderstood {
        attempts: u32,
        failures: Vec<AttemptFailure>,
        processing_ms: u64,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Process one player utterance end to end.
pub struct ProcessPlayerInput {
    compiler: Arc<IntentCompiler>,
    dispatcher: Arc<CommandDispatcher>,
    dialogue: Arc<DialogueResolver>,
}

impl ProcessPlayerInput {
    pub fn new(
        compiler: Arc<IntentCompiler>,
        dispatcher: Arc<CommandDispatcher>,
        dialogue: Arc<DialogueResolver>,
    ) -> Self {
        Self {
            compiler,
            dispatcher,
            dialogue,
        }
    }

    pub async fn execute(&self, text: &str) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("process_input", run_id = %short_id(&run_id));
        self.run(text, run_id).instrument(span).await
    }

    async fn run(&self, text: &str, run_id: Uuid) -> Result<PipelineOutcome, PipelineError> {
        let started = Instant::now();

        let compile_started = Instant::now();
        let compiled = match self.compiler.compile(text).await {
            Ok(compiled) => compiled,
            Err(failure) => {
                let processing_ms = millis(started.elapsed());
                tracing::warn!(
                    input = %text,
                    attempts = failure.attempts,
                    processing_ms,
                    "Could not understand player input"
                );
                return Ok(PipelineOutcome::NotUnderstood {
                    attempts: failure.attempts,
                    failures: failure.failures,
                    processing_ms,
                });
            }
        };
        let compile_ms = millis(compile_started.elapsed());

        let dispatch_started = Instant::now();
        let response = match self.dispatcher.execute(&compiled.command) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Dispatcher produced an invalid response");
                return Err(e.into());
            }
        };
        let dispatch_ms = millis(dispatch_started.elapsed());

        let dialogue_started = Instant::now();
        let dialogue = self.dialogue.resolve(&response);
        let dialogue_ms = millis(dialogue_started.elapsed());

        let report = ExecutionReport {
            run_id,
            input: text.to_string(),
            command: compiled.command,
            response,
            dialogue,
            attempts: compiled.attempts,
            timings: StageTimings {
                compile_ms,
                dispatch_ms,
                dialogue_ms,
                total_ms: millis(started.elapsed()),
            },
        };
        log_execution_report(&report);
        Ok(PipelineOutcome::Executed(report))
    }
}

fn log_execution_report(report: &ExecutionReport) {
    let Some((result, line)) = report.primary() else {
        return;
    };
    let requested = report.command.actions.first();
    tracing::info!(
        input = %report.input,
        compiled_type = requested.map(|a| a.kind.as_str()).unwrap_or_default(),
        target_hint = requested
            .and_then(|a| a.target.as_ref())
            .and_then(|t| t.category_hint.as_deref())
            .unwrap_or_default(),
        executed_type = %result.action_type_executed,
        status = result.status,
        reason = result.reason.as_deref().unwrap_or_default(),
        response_id = %result.response_id,
        dialogue = %line,
        actions = report.response.actions.len(),
        attempts = report.attempts,
        compile_ms = report.timings.compile_ms,
        dispatch_ms = report.timings.dispatch_ms,
        dialogue_ms = report.timings.dialogue_ms,
        total_ms = report.timings.total_ms,
        "Execution report"
    );
}

/// First eight hex digits, enough to tell concurrent runs apart in logs.
fn short_id(id: &Uuid) -> String {
    id.simple().to_string().chars().take(8).collect()
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmError, LlmResponse, MockLlmPort};
    use crate::stores::CompanionStateStore;
    use squadlink_domain::CompanionId;

    fn command_json(action_type: &str, descriptors: &[&str]) -> String {
        serde_json::json!({
            "command_id": "cmd_001",
            "actions": [{
                "action_id": "act_001",
                "type": action_type,
                "target": {"descriptors": descriptors, "category_hint": "enemy"},
                "parameters": {},
                "assigned_to": "companion_01",
                "priority": "normal",
                "depends_on": null
            }],
            "dialogue_context": "test",
            "requires_clarification": false
        })
        .to_string()
    }

    fn pipeline(llm: MockLlmPort) -> (ProcessPlayerInput, Arc<CompanionStateStore>) {
        let store = Arc::new(CompanionStateStore::new());
        let pipeline = ProcessPlayerInput::new(
            Arc::new(IntentCompiler::new(Arc::new(llm))),
            Arc::new(CommandDispatcher::new(store.clone())),
            Arc::new(DialogueResolver::new()),
        );
        (pipeline, store)
    }

    fn executed(outcome: PipelineOutcome) -> ExecutionReport {
        match outcome {
            PipelineOutcome::Executed(report) => report,
            other => panic!("expected execution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn follow_me_then_repeat() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(2)
            .returning(|_| Ok(LlmResponse::text(command_json("follow", &["player"]))));
        let (pipeline, store) = pipeline(llm);

        let first = executed(pipeline.execute("follow me").await.unwrap());
        let (result, line) = first.primary().unwrap();
        assert_eq!(result.response_id, "RESP_FOLLOW_ACCEPT");
        assert_eq!(line, "Right behind you.");
        assert_eq!(first.attempts, 1);
        assert!(store.snapshot(&CompanionId::default()).is_following);

        let second = executed(pipeline.execute("follow me").await.unwrap());
        assert_ne!(first.run_id, second.run_id);
        let (result, line) = second.primary().unwrap();
        assert!(!result.status);
        assert_eq!(result.reason.as_deref(), Some("already_following"));
        assert_eq!(result.response_id, "RESP_ALREADY_FOLLOWING");
        assert_eq!(line, "I'm already following you.");
    }

    #[test]
    fn short_id_is_uuid_prefix() {
        let id = Uuid::new_v4();
        let short = short_id(&id);
        assert_eq!(short.len(), 8);
        assert!(id.simple().to_string().starts_with(&short));
    }

    #[tokio::test]
    async fn engage_with_no_descriptors_is_no_target() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(LlmResponse::text(command_json("engage", &[]))));
        let (pipeline, _) = pipeline(llm);

        let report = executed(pipeline.execute("shoot").await.unwrap());
        let (result, line) = report.primary().unwrap();
        assert_eq!(result.reason.as_deref(), Some("no_target"));
        assert_eq!(line, "I don't see a target.");
    }

    #[tokio::test]
    async fn exhausted_compiler_executes_nothing() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(3)
            .returning(|_| Err(LlmError::RequestFailed("connection refused".into())));
        let (pipeline, store) = pipeline(llm);

        let outcome = pipeline.execute("follow me").await.unwrap();

        match outcome {
            PipelineOutcome::NotUnderstood {
                attempts, failures, ..
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected NotUnderstood, got {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn report_carries_one_line_per_action() {
        let multi = serde_json::json!({
            "command_id": "cmd_multi",
            "actions": [
                {"action_id": "a1", "type": "take_cover", "assigned_to": "companion_01", "priority": "high"},
                {"action_id": "a2", "type": "suppress", "assigned_to": "companion_01", "priority": "high",
                 "parameters": {"spatial_direction": "Front"}}
            ],
            "dialogue_context": "get to cover and suppress forward",
            "requires_clarification": false
        })
        .to_string();
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(move |_| Ok(LlmResponse::text(multi.clone())));
        let (pipeline, _) = pipeline(llm);

        let text = "get to cover and suppress forward";
        let report = executed(pipeline.execute(text).await.unwrap());

        assert_eq!(
            report.dialogue,
            vec!["Taking cover.", "Laying down suppressing fire!"]
        );
        assert_eq!(report.response.actions.len(), 2);
        assert!(report.timings.total_ms >= report.timings.compile_ms);
    }
}
