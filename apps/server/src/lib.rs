//! HTTP server for the examdeck exam API.
//!
//! Provides a REST API for:
//! - Drawing a randomized exam from the parsed question bank
//! - Submitting answers for grading and leaderboard recording
//! - Reading the leaderboard
//! - Health and status checks

mod http;
mod state;

use std::path::PathBuf;

pub use http::create_router;
pub use state::{AppState, ExamSession};

use tracing::info;

use examdeck_exam::build_bank;
use examdeck_shared::{ExamdeckError, Result};
use examdeck_storage::Storage;

/// Options for [`serve`], merged from config file and CLI flags.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Path to the extracted exam document.
    pub document: PathBuf,
    /// Path to the leaderboard database.
    pub db_path: PathBuf,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum questions per drawn exam.
    pub question_cap: usize,
}

/// Parse the document, open storage, and serve the API until shutdown.
pub async fn serve(opts: ServeOptions) -> Result<()> {
    let bank = build_bank(&opts.document)?;
    info!(
        questions = bank.questions.len(),
        dropped = bank.dropped.len(),
        document = %opts.document.display(),
        "question bank ready"
    );

    let storage = Storage::open(&opts.db_path).await?;

    let state = AppState::new(bank, storage, opts.question_cap);
    let router = create_router(state);

    let addr = format!("{}:{}", opts.host, opts.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExamdeckError::validation(format!("cannot bind {addr}: {e}")))?;

    info!(%addr, "examdeck server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| ExamdeckError::validation(format!("server error: {e}")))?;

    Ok(())
}
