//! Use cases - User story orchestration.
//!
//! Each module covers one stage of turning player text into companion
//! behavior and speech.

pub mod compile;
pub mod dialogue;
pub mod dispatch;
pub mod pipeline;

pub use compile::{CompileFailure, CompiledCommand, CompilerSettings, IntentCompiler};
pub use dialogue::DialogueResolver;
pub use dispatch::{CommandDispatcher, DispatchError};
pub use pipeline::{
    ExecutionReport, PipelineError, PipelineOutcome, ProcessPlayerInput, StageTimings,
};
