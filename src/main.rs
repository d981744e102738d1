// src/main.rs — promptbench entry point

use std::sync::Arc;

use clap::Parser;

use promptbench::api::{self, AppState};
use promptbench::infra::config::Settings;
use promptbench::infra::logger;

/// Batch-test LLM prompts over HTTP.
#[derive(Parser, Debug)]
#[command(name = "promptbench", version, about)]
struct Cli {
    /// Bind address (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Log verbosity (overrides LOG_LEVEL; RUST_LOG wins over both).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    logger::init_logging(&settings.log_level);

    if settings.fallback_api_key().is_none() {
        tracing::warn!(
            "No OPENROUTER_API_KEY or OPENAI_API_KEY configured; \
             executions without a caller-supplied key will return mock results"
        );
    }

    if let Err(e) = run(settings).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let state = AppState::new(Arc::new(settings));
    api::start_server(state).await
}
