//! HTTP routes and handlers for the exam API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use examdeck_exam::{ExamQuestion, ExamReport, draw, grade};
use examdeck_shared::RunId;

use crate::state::{AppState, ExamSession};

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/api/questions", get(questions))
        .route("/api/submit", post(submit))
        .route("/api/leaderboard", get(leaderboard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Response envelope
// =============================================================================

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    duration_ms: u64,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T, duration_ms: u64) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            duration_ms,
        })
    }

    fn err(error: impl ToString, duration_ms: u64) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            duration_ms,
        })
    }
}

// =============================================================================
// Health & status
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "examdeck-server"
    }))
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    question_count: usize,
    dropped_count: usize,
    source_hash: String,
    open_sessions: usize,
    uptime_seconds: f64,
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let start = Instant::now();
    let data = StatusResponse {
        status: "running".to_string(),
        question_count: state.bank.questions.len(),
        dropped_count: state.bank.dropped.len(),
        source_hash: state.bank.source_hash.clone(),
        open_sessions: state.open_session_count().await,
        uptime_seconds: state.uptime_seconds(),
    };
    ApiResponse::ok(data, start.elapsed().as_millis() as u64)
}

// =============================================================================
// Questions
// =============================================================================

#[derive(Deserialize)]
struct QuestionsParams {
    /// Number of questions to draw (capped by the server's configured max).
    count: Option<usize>,
}

/// A question as exposed to the taker: correctness flags stripped.
#[derive(Serialize)]
struct ServedQuestion {
    original_id: u32,
    text: String,
    options: Vec<String>,
}

impl From<&ExamQuestion> for ServedQuestion {
    fn from(q: &ExamQuestion) -> Self {
        Self {
            original_id: q.original_id,
            text: q.text.clone(),
            options: q.options.iter().map(|o| o.text.clone()).collect(),
        }
    }
}

#[derive(Serialize)]
struct QuestionsResponse {
    session_id: RunId,
    questions: Vec<ServedQuestion>,
}

async fn questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionsParams>,
) -> impl IntoResponse {
    let start = Instant::now();

    let cap = params
        .count
        .unwrap_or(state.question_cap)
        .min(state.question_cap);

    let drawn = draw(&state.bank.questions, cap, &mut rand::thread_rng());

    let run_id = match state
        .storage
        .insert_exam_run(&state.bank.source_hash, drawn.len() as u32)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "failed to record exam run");
            return ApiResponse::err(e, start.elapsed().as_millis() as u64);
        }
    };

    let served: Vec<ServedQuestion> = drawn.iter().map(ServedQuestion::from).collect();

    state
        .insert_session(
            run_id,
            ExamSession {
                questions: drawn,
                created_at: chrono::Utc::now(),
            },
        )
        .await;

    info!(session = %run_id, questions = served.len(), "exam drawn");

    ApiResponse::ok(
        QuestionsResponse {
            session_id: run_id,
            questions: served,
        },
        start.elapsed().as_millis() as u64,
    )
}

// =============================================================================
// Submit
// =============================================================================

#[derive(Deserialize)]
struct SubmitRequest {
    session_id: RunId,
    player: String,
    /// Per-question selected option index (served order); null = skipped.
    answers: Vec<Option<usize>>,
}

#[derive(Serialize)]
struct SubmitResponse {
    report: ExamReport,
    /// Whether this result became the player's new personal best.
    best_updated: bool,
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> impl IntoResponse {
    let start = Instant::now();

    let player = req.player.trim();
    if player.is_empty() || player.chars().count() > 64 {
        return ApiResponse::err(
            "player name must be 1-64 characters",
            start.elapsed().as_millis() as u64,
        );
    }

    let Some(session) = state.take_session(&req.session_id).await else {
        return ApiResponse::err(
            format!(
                "unknown, expired, or already-submitted session {}",
                req.session_id
            ),
            start.elapsed().as_millis() as u64,
        );
    };

    let report = grade(&session.questions, &req.answers);

    let stats_json = serde_json::json!({
        "correct": report.correct,
        "wrong": report.wrong,
        "unanswered": report.unanswered,
        "total": report.total,
        "percent": report.percent,
    })
    .to_string();

    if let Err(e) = state
        .storage
        .finish_exam_run(req.session_id, player, &stats_json)
        .await
    {
        warn!(error = %e, "failed to finish exam run");
    }

    let best_updated = match state
        .storage
        .record_score(player, report.correct as u32, report.total as u32)
        .await
    {
        Ok(updated) => updated,
        Err(e) => {
            warn!(error = %e, "failed to record score");
            false
        }
    };

    info!(
        session = %req.session_id,
        player,
        correct = report.correct,
        total = report.total,
        "exam submitted"
    );

    ApiResponse::ok(
        SubmitResponse {
            report,
            best_updated,
        },
        start.elapsed().as_millis() as u64,
    )
}

// =============================================================================
// Leaderboard
// =============================================================================

#[derive(Deserialize)]
struct LeaderboardParams {
    limit: Option<u32>,
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    let start = Instant::now();
    let limit = params.limit.unwrap_or(10).min(100);

    match state.storage.leaderboard(limit).await {
        Ok(rows) => ApiResponse::ok(rows, start.elapsed().as_millis() as u64),
        Err(e) => ApiResponse::err(e, start.elapsed().as_millis() as u64),
    }
}
