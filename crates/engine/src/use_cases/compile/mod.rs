//! Intent compilation use case.
//!
//! Turns free player text into a schema-valid `Command` by calling the LLM
//! port and checking what comes back. Model output is untrusted: every
//! attempt is parsed and validated, and a bad attempt is retried until the
//! attempt budget is spent. Exhaustion is an ordinary `Err`, never a panic.

mod prompt;

pub use prompt::{user_prompt, INTENT_COMPILER_SYSTEM_PROMPT};

use std::sync::Arc;

use serde_json::Value;
use squadlink_domain::{validate_command, Command, SchemaViolation};

use crate::infrastructure::config::{
    EngineConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::infrastructure::ports::{FinishReason, LlmError, LlmPort, LlmRequest};

/// Sampling and retry settings for the compiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilerSettings {
    /// Total attempts, at least 1
    pub max_attempts: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&EngineConfig> for CompilerSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A command that passed validation, with the attempt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCommand {
    pub command: Command,
    pub attempts: u32,
}

/// Why a single attempt was discarded.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AttemptFailure {
    #[error("Empty response from model")]
    EmptyResponse,
    #[error("Model output truncated at {max_tokens} tokens")]
    Truncated { max_tokens: u32 },
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("Command decode failed: {0}")]
    Decode(String),
}

/// Every attempt failed. The caller reports "could not understand" and
/// executes nothing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to compile a valid command after {attempts} attempts")]
pub struct CompileFailure {
    pub attempts: u32,
    /// One entry per attempt, in order
    pub failures: Vec<AttemptFailure>,
}

enum LoopState {
    Attempting(u32),
    Succeeded(CompiledCommand),
    ExhaustedFailed,
}

/// Bounded-retry compiler from player text to `Command`.
pub struct IntentCompiler {
    llm: Arc<dyn LlmPort>,
    settings: CompilerSettings,
}

impl IntentCompiler {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self::with_settings(llm, CompilerSettings::default())
    }

    pub fn with_settings(llm: Arc<dyn LlmPort>, settings: CompilerSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub async fn compile(&self, text: &str) -> Result<CompiledCommand, CompileFailure> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut failures = Vec::new();
        let mut state = LoopState::Attempting(1);

        tracing::info!(input = %text, max_attempts, "Compiling player intent");

        loop {
            state = match state {
                LoopState::Attempting(attempt) => match self.attempt(text).await {
                    Ok(command) => LoopState::Succeeded(CompiledCommand {
                        command,
                        attempts: attempt,
                    }),
                    Err(failure) => {
                        tracing::warn!(
                            attempt,
                            max_attempts,
                            error = %failure,
                            "Compile attempt failed"
                        );
                        failures.push(failure);
                        if attempt >= max_attempts {
                            LoopState::ExhaustedFailed
                        } else {
                            LoopState::Attempting(attempt + 1)
                        }
                    }
                },
                LoopState::Succeeded(compiled) => {
                    tracing::info!(
                        command_id = %compiled.command.command_id,
                        attempts = compiled.attempts,
                        actions = compiled.command.actions.len(),
                        "Compiled valid command"
                    );
                    return Ok(compiled);
                }
                LoopState::ExhaustedFailed => {
                    tracing::error!(attempts = max_attempts, "Failed to compile a valid command");
                    return Err(CompileFailure {
                        attempts: max_attempts,
                        failures,
                    });
                }
            };
        }
    }

    async fn attempt(&self, text: &str) -> Result<Command, AttemptFailure> {
        let request = LlmRequest::new(user_prompt(text))
            .with_system_prompt(INTENT_COMPILER_SYSTEM_PROMPT)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(Some(self.settings.max_tokens));

        let response = self.llm.generate(request).await?;
        let raw = response.content.trim();
        tracing::debug!(
            raw_output = %raw,
            finish_reason = ?response.finish_reason,
            prompt_tokens = response.usage.map(|u| u.prompt_tokens),
            completion_tokens = response.usage.map(|u| u.completion_tokens),
            "Raw model output"
        );

        if raw.is_empty() {
            return Err(AttemptFailure::EmptyResponse);
        }
        // Length-limited output is treated as incomplete even when it parses
        if response.finish_reason == FinishReason::Length {
            return Err(AttemptFailure::Truncated {
                max_tokens: self.settings.max_tokens,
            });
        }

        let value: Value = serde_json::from_str(extract_json(raw))
            .map_err(|e| AttemptFailure::MalformedJson(e.to_string()))?;
        validate_command(&value)?;
        serde_json::from_value(value).map_err(|e| AttemptFailure::Decode(e.to_string()))
    }
}

/// Strip a ```json or ``` fence around the payload.
///
/// Only the first fence is considered. An unclosed fence leaves the text as is.
pub fn extract_json(raw: &str) -> &str {
    for fence in ["```json", "```"] {
        if let Some(start) = raw.find(fence) {
            let body = &raw[start + fence.len()..];
            return match body.find("```") {
                Some(end) => body[..end].trim(),
                None => raw,
            };
        }
    }
    raw
}
