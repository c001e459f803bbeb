//! SquadLink Engine library.
//!
//! Turns free-text player commands into companion actions and dialogue.
//!
//! ## Structure
//!
//! - `use_cases/` - Compile, dispatch, dialogue, and the pipeline that sequences them
//! - `stores/` - In-memory companion state
//! - `infrastructure/` - External dependency implementations (ports + adapters) and config
//! - `api/` - HTTP entry points
//! - `cli` - Console output for the one-shot runner
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
