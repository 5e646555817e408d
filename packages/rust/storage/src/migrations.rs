//! SQL migration definitions for the examdeck database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed as a batch.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: scores, exam_runs",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per player, holding their best result.
-- Display names are unique by construction (primary key).
CREATE TABLE IF NOT EXISTS scores (
    player       TEXT PRIMARY KEY,
    best_correct INTEGER NOT NULL,
    best_total   INTEGER NOT NULL,
    best_percent REAL NOT NULL,
    achieved_at  TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scores_percent ON scores(best_percent DESC);

-- One row per served exam, finished when the taker submits.
CREATE TABLE IF NOT EXISTS exam_runs (
    id             TEXT PRIMARY KEY,
    source_hash    TEXT NOT NULL,
    question_count INTEGER NOT NULL,
    player         TEXT,
    stats_json     TEXT,
    started_at     TEXT NOT NULL,
    finished_at    TEXT
);

CREATE INDEX IF NOT EXISTS idx_exam_runs_source ON exam_runs(source_hash);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
