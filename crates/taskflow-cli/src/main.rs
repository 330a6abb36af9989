use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod cli;

use cli::Cli;
use taskflow_service::{BackendKind, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow=info,taskflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run CLI
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load()?;

    // Flags win over the environment
    if let Some(url) = cli.backend_url {
        settings.backend_url = url;
    }
    if let Some(canvas_id) = cli.canvas_id {
        settings.canvas_id = canvas_id;
    }
    if let Some(path) = cli.local_store {
        settings.local_store_path = path;
    }
    if cli.memory {
        settings.backend = BackendKind::Memory;
    }

    commands::execute(cli.command, settings).await
}
