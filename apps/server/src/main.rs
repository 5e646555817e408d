//! Standalone entry point for the examdeck exam server.
//!
//! The same server is reachable through `examdeck serve`; this binary exists
//! for deployments that only need the API.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

use examdeck_server::{ServeOptions, serve};
use examdeck_shared::load_config;

/// examdeck exam API server.
#[derive(Parser)]
#[command(name = "examdeck-server", version, about)]
struct Args {
    /// Path to the extracted exam document (overrides config).
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Bind host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Leaderboard database path (overrides config).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Maximum questions per exam (overrides config).
    #[arg(long)]
    cap: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("examdeck=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = load_config()?;

    let opts = ServeOptions {
        document: args
            .document
            .unwrap_or_else(|| PathBuf::from(&config.defaults.document)),
        db_path: match args.db {
            Some(p) => p,
            None => config.storage.resolved_db_path()?,
        },
        host: args.host.unwrap_or_else(|| config.server.host.clone()),
        port: args.port.unwrap_or(config.server.port),
        question_cap: args.cap.unwrap_or(config.defaults.question_cap),
    };

    serve(opts).await?;
    Ok(())
}
