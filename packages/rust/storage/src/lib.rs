//! libSQL storage layer for the leaderboard and exam-run history.
//!
//! The [`Storage`] struct wraps a local libSQL database holding per-player
//! best scores and one row per served exam.
//!
//! **Access rules:**
//! - server/CLI: read-write (sole writer) via [`Storage::open`]
//! - external readers (reporting, backups): [`Storage::open_readonly`]

mod migrations;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};

use examdeck_shared::{ExamdeckError, Result, RunId};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

/// One leaderboard row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScoreRow {
    pub player: String,
    pub best_correct: u32,
    pub best_total: u32,
    pub best_percent: f64,
    pub achieved_at: String,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExamdeckError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open a database at `path` in read-only mode.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    ExamdeckError::Storage(format!("migration v{} failed: {e}", migration.version))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(ExamdeckError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Score operations
    // -----------------------------------------------------------------------

    /// Record a result for `player`, keeping only their best percent.
    ///
    /// Returns `true` when the row was inserted or improved. Ties keep the
    /// earlier result.
    pub async fn record_score(&self, player: &str, correct: u32, total: u32) -> Result<bool> {
        self.check_writable()?;

        let percent = if total == 0 {
            0.0
        } else {
            f64::from(correct) * 100.0 / f64::from(total)
        };
        let now = Utc::now().to_rfc3339();

        let affected = self
            .conn
            .execute(
                "INSERT INTO scores (player, best_correct, best_total, best_percent, achieved_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(player) DO UPDATE SET
                   best_correct = excluded.best_correct,
                   best_total = excluded.best_total,
                   best_percent = excluded.best_percent,
                   achieved_at = excluded.achieved_at,
                   updated_at = excluded.updated_at
                 WHERE excluded.best_percent > scores.best_percent",
                params![player, correct, total, percent, now.as_str()],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        Ok(affected > 0)
    }

    /// Get one player's best score, if they have played.
    pub async fn best_score(&self, player: &str) -> Result<Option<ScoreRow>> {
        let mut rows = self
            .conn
            .query(
                "SELECT player, best_correct, best_total, best_percent, achieved_at
                 FROM scores WHERE player = ?1",
                params![player],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_score(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(ExamdeckError::Storage(e.to_string())),
        }
    }

    /// Top `limit` scores by best percent, then by who got there first.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<ScoreRow>> {
        let mut rows = self
            .conn
            .query(
                "SELECT player, best_correct, best_total, best_percent, achieved_at
                 FROM scores
                 ORDER BY best_percent DESC, achieved_at ASC
                 LIMIT ?1",
                params![limit],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_score(&row)?);
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Exam run operations
    // -----------------------------------------------------------------------

    /// Insert a new exam run. Returns the generated run ID.
    pub async fn insert_exam_run(&self, source_hash: &str, question_count: u32) -> Result<RunId> {
        self.check_writable()?;
        let id = RunId::new();
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO exam_runs (id, source_hash, question_count, started_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id.to_string(), source_hash, question_count, now.as_str()],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;
        Ok(id)
    }

    /// Mark an exam run finished, attaching the player and graded stats.
    pub async fn finish_exam_run(
        &self,
        run_id: RunId,
        player: &str,
        stats_json: &str,
    ) -> Result<()> {
        self.check_writable()?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "UPDATE exam_runs SET player = ?1, stats_json = ?2, finished_at = ?3 WHERE id = ?4",
                params![player, stats_json, now.as_str(), run_id.to_string()],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Count runs recorded for a given source document.
    pub async fn run_count(&self, source_hash: &str) -> Result<u32> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM exam_runs WHERE source_hash = ?1",
                params![source_hash],
            )
            .await
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<u32>(0)
                .map_err(|e| ExamdeckError::Storage(e.to_string())),
            Ok(None) => Ok(0),
            Err(e) => Err(ExamdeckError::Storage(e.to_string())),
        }
    }
}

/// Convert a database row to a [`ScoreRow`].
fn row_to_score(row: &libsql::Row) -> Result<ScoreRow> {
    Ok(ScoreRow {
        player: row
            .get::<String>(0)
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?,
        best_correct: row
            .get::<u32>(1)
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?,
        best_total: row
            .get::<u32>(2)
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?,
        best_percent: row
            .get::<f64>(3)
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?,
        achieved_at: row
            .get::<String>(4)
            .map_err(|e| ExamdeckError::Storage(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Create a temp file storage for testing.
    async fn test_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("examdeck_test_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("open test db")
    }

    #[tokio::test]
    async fn open_and_migrate() {
        let storage = test_storage().await;
        assert_eq!(storage.get_schema_version().await, 1);
    }

    #[tokio::test]
    async fn idempotent_migration() {
        let tmp = std::env::temp_dir().join(format!("examdeck_test_{}.db", Uuid::now_v7()));
        let s1 = Storage::open(&tmp).await.expect("first open");
        drop(s1);
        let s2 = Storage::open(&tmp).await.expect("second open");
        assert_eq!(s2.get_schema_version().await, 1);
    }

    #[tokio::test]
    async fn record_score_keeps_best() {
        let storage = test_storage().await;

        assert!(storage.record_score("ayten", 30, 50).await.expect("insert"));
        // Worse result does not overwrite
        assert!(!storage.record_score("ayten", 10, 50).await.expect("worse"));
        // Better result does
        assert!(storage.record_score("ayten", 45, 50).await.expect("better"));

        let best = storage
            .best_score("ayten")
            .await
            .expect("query")
            .expect("row");
        assert_eq!(best.best_correct, 45);
        assert_eq!(best.best_percent, 90.0);
    }

    #[tokio::test]
    async fn leaderboard_orders_by_percent() {
        let storage = test_storage().await;
        storage.record_score("a", 10, 50).await.expect("a");
        storage.record_score("b", 40, 50).await.expect("b");
        storage.record_score("c", 25, 50).await.expect("c");

        let rows = storage.leaderboard(10).await.expect("leaderboard");
        let players: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["b", "c", "a"]);

        let top_two = storage.leaderboard(2).await.expect("limited");
        assert_eq!(top_two.len(), 2);
    }

    #[tokio::test]
    async fn unknown_player_has_no_score() {
        let storage = test_storage().await;
        assert!(
            storage
                .best_score("nobody")
                .await
                .expect("query")
                .is_none()
        );
    }

    #[tokio::test]
    async fn exam_run_lifecycle() {
        let storage = test_storage().await;
        let run = storage
            .insert_exam_run("deadbeef", 50)
            .await
            .expect("insert run");
        storage
            .finish_exam_run(run, "ayten", r#"{"correct":40}"#)
            .await
            .expect("finish run");
        assert_eq!(storage.run_count("deadbeef").await.expect("count"), 1);
        assert_eq!(storage.run_count("other").await.expect("count"), 0);
    }

    #[tokio::test]
    async fn readonly_rejects_writes() {
        let tmp = std::env::temp_dir().join(format!("examdeck_test_{}.db", Uuid::now_v7()));
        let rw = Storage::open(&tmp).await.expect("open rw");
        rw.record_score("a", 1, 2).await.expect("seed");
        drop(rw);

        let ro = Storage::open_readonly(&tmp).await.expect("open ro");
        let err = ro.record_score("a", 2, 2).await.unwrap_err();
        assert!(matches!(err, ExamdeckError::Storage(_)));
        // Reads still work
        assert!(ro.best_score("a").await.expect("read").is_some());
    }
}
