//! examdeck CLI — exam document parsing and serving tool.
//!
//! Parses fixed-convention exam documents into question banks, draws
//! randomized exams, and serves the interactive exam API.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
