//! Shared application state for the exam server.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use examdeck_exam::{ExamQuestion, QuestionBank};
use examdeck_shared::RunId;
use examdeck_storage::Storage;

/// Sessions not submitted within this window are dropped.
pub const SESSION_TTL_MINUTES: i64 = 120;

/// One in-flight exam: the drawn questions in served order, keyed by the
/// run id handed to the client. Grading needs the served order because the
/// taker's answers are indexes into the shuffled option lists.
pub struct ExamSession {
    pub questions: Vec<ExamQuestion>,
    pub created_at: DateTime<Utc>,
}

impl ExamSession {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::minutes(SESSION_TTL_MINUTES)
    }
}

/// Shared application state.
pub struct AppState {
    /// The parsed question bank (immutable once the server is up).
    pub bank: QuestionBank,
    /// Leaderboard and run-history database.
    pub storage: Storage,
    /// Maximum questions per drawn exam.
    pub question_cap: usize,
    /// Sessions awaiting submission, pruned on insert.
    sessions: RwLock<HashMap<RunId, ExamSession>>,
    started: Instant,
}

impl AppState {
    pub fn new(bank: QuestionBank, storage: Storage, question_cap: usize) -> Self {
        Self {
            bank,
            storage,
            question_cap,
            sessions: RwLock::new(HashMap::new()),
            started: Instant::now(),
        }
    }

    /// Store a new session, sweeping out any that outlived the TTL so
    /// abandoned exams cannot grow the map without bound.
    pub async fn insert_session(&self, id: RunId, session: ExamSession) {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(id, session);
    }

    /// Remove and return a session. Expired sessions are discarded and
    /// reported as absent, same as an unknown id.
    pub async fn take_session(&self, id: &RunId) -> Option<ExamSession> {
        let session = self.sessions.write().await.remove(id)?;
        if session.is_expired(Utc::now()) {
            return None;
        }
        Some(session)
    }

    /// Number of sessions currently awaiting submission.
    pub async fn open_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_state() -> AppState {
        let tmp = std::env::temp_dir().join(format!("examdeck_state_{}.db", Uuid::now_v7()));
        let storage = Storage::open(&tmp).await.expect("open test db");
        let bank = QuestionBank {
            questions: Vec::new(),
            dropped: Vec::new(),
            source_hash: "0".repeat(64),
        };
        AppState::new(bank, storage, 50)
    }

    fn session_aged(minutes: i64) -> ExamSession {
        ExamSession {
            questions: Vec::new(),
            created_at: Utc::now() - Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn fresh_session_roundtrips() {
        let state = test_state().await;
        let id = RunId::new();
        state.insert_session(id, session_aged(0)).await;
        assert_eq!(state.open_session_count().await, 1);
        assert!(state.take_session(&id).await.is_some());
        assert_eq!(state.open_session_count().await, 0);
    }

    #[tokio::test]
    async fn taking_a_session_consumes_it() {
        let state = test_state().await;
        let id = RunId::new();
        state.insert_session(id, session_aged(0)).await;
        assert!(state.take_session(&id).await.is_some());
        // A second submit with the same id finds nothing.
        assert!(state.take_session(&id).await.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() {
        let state = test_state().await;
        let id = RunId::new();
        state
            .insert_session(id, session_aged(SESSION_TTL_MINUTES + 1))
            .await;
        assert!(state.take_session(&id).await.is_none());
        assert_eq!(state.open_session_count().await, 0);
    }

    #[tokio::test]
    async fn insert_sweeps_abandoned_sessions() {
        let state = test_state().await;
        let stale_a = RunId::new();
        let stale_b = RunId::new();
        state
            .insert_session(stale_a, session_aged(SESSION_TTL_MINUTES + 5))
            .await;
        state
            .insert_session(stale_b, session_aged(SESSION_TTL_MINUTES + 5))
            .await;

        let fresh = RunId::new();
        state.insert_session(fresh, session_aged(0)).await;

        // The stale sessions were dropped by the sweep; only the fresh
        // one remains.
        assert_eq!(state.open_session_count().await, 1);
        assert!(state.take_session(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn unknown_session_is_absent() {
        let state = test_state().await;
        assert!(state.take_session(&RunId::new()).await.is_none());
    }
}
