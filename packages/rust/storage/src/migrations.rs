//! SQL migration definitions for the BrandGate database.
//!
//! Migrations are applied in order on database open. Table names carry the
//! environment suffix (`_dev` in test mode), and applied versions are
//! tracked per environment so switching environments creates the missing
//! tables on first use.

use brandgate_shared::Environment;

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: String,
}

/// All migrations for `env`, in ascending version order.
pub(crate) fn all_migrations(env: Environment) -> Vec<Migration> {
    let s = env.table_suffix();
    vec![Migration {
        version: 1,
        description: "Initial schema: submission_requests (ledger), ingestion_queue",
        sql: format!(
            r#"
-- Schema version tracking, per environment
CREATE TABLE IF NOT EXISTS schema_migrations (
    version     INTEGER NOT NULL,
    environment TEXT NOT NULL,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (version, environment)
);

-- Request ledger: one row per subject per submission attempt
CREATE TABLE IF NOT EXISTS submission_requests{s} (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id      TEXT NOT NULL,
    subject_kind    TEXT NOT NULL,
    subject_value   TEXT NOT NULL,
    secondary_value TEXT,
    request_type    TEXT NOT NULL,
    requestor_name  TEXT NOT NULL,
    requestor_email TEXT NOT NULL,
    is_multi        INTEGER NOT NULL,
    status          INTEGER NOT NULL,
    submitted_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_submission_requests{s}_request_id
    ON submission_requests{s}(request_id);
CREATE INDEX IF NOT EXISTS idx_submission_requests{s}_submitted_at
    ON submission_requests{s}(submitted_at);

-- Ingestion queue: polled by downstream automation
CREATE TABLE IF NOT EXISTS ingestion_queue{s} (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    query_type  TEXT NOT NULL,
    query_value TEXT NOT NULL,
    request_id  TEXT NOT NULL,
    status      INTEGER NOT NULL DEFAULT 0,
    written_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingestion_queue{s}_request_id
    ON ingestion_queue{s}(request_id);

INSERT INTO schema_migrations (version, environment) VALUES (1, '{env}');
"#,
            s = s,
            env = env.as_str(),
        ),
    }]
}
