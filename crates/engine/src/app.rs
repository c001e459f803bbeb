//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{config::EngineConfig, ports::LlmPort};
use crate::stores::CompanionStateStore;
use crate::use_cases::{
    CommandDispatcher, CompilerSettings, DialogueResolver, IntentCompiler, ProcessPlayerInput,
};

/// Main application state.
///
/// Holds the companion store and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub config: EngineConfig,
    pub companions: Arc<CompanionStateStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub compiler: Arc<IntentCompiler>,
    pub dispatcher: Arc<CommandDispatcher>,
    pub dialogue: Arc<DialogueResolver>,
    pub process_input: Arc<ProcessPlayerInput>,
}

impl App {
    pub fn new(config: EngineConfig, llm: Arc<dyn LlmPort>) -> Self {
        Self::with_dialogue(config, llm, DialogueResolver::new())
    }

    pub fn with_dialogue(
        config: EngineConfig,
        llm: Arc<dyn LlmPort>,
        dialogue: DialogueResolver,
    ) -> Self {
        let companions = Arc::new(CompanionStateStore::new());

        let compiler = Arc::new(IntentCompiler::with_settings(
            llm,
            CompilerSettings::from(&config),
        ));
        let dispatcher = Arc::new(
            CommandDispatcher::new(companions.clone())
                .with_default_companion(config.default_companion.clone()),
        );
        let dialogue = Arc::new(dialogue);
        let process_input = Arc::new(ProcessPlayerInput::new(
            compiler.clone(),
            dispatcher.clone(),
            dialogue.clone(),
        ));

        tracing::info!(
            max_attempts = config.max_attempts,
            default_companion = %config.default_companion,
            dialogue_lines = dialogue.len(),
            "Application composed"
        );

        Self {
            config,
            companions,
            use_cases: UseCases {
                compiler,
                dispatcher,
                dialogue,
                process_input,
            },
        }
    }
}
