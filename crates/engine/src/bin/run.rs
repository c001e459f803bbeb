//! SquadLink one-shot runner: compile and execute one utterance, print the trace.
//!
//! Usage: `squadlink-run follow me`

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use squadlink_engine::cli::{render_outcome, succeeded};
use squadlink_engine::infrastructure::{
    config::{load_dotenv_from_repo_root, EngineConfig},
    ollama::OllamaClient,
};
use squadlink_engine::App;

const USAGE: &str = "Usage: squadlink-run <command text>

Examples:
  squadlink-run follow me
  squadlink-run stop following
  squadlink-run wait here
  squadlink-run attack that enemy
  squadlink-run do a backflip      (unsupported)";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squadlink_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let input = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if input.trim().is_empty() {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    }

    let config = EngineConfig::from_env();
    let llm = Arc::new(OllamaClient::with_timeout(
        &config.ollama_base_url,
        &config.ollama_model,
        config.timeout_secs,
    ));
    let app = App::new(config, llm);

    let outcome = app.use_cases.process_input.execute(&input).await?;
    print!("{}", render_outcome(&input, &outcome));

    Ok(if succeeded(&outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
