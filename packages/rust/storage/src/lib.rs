//! libSQL storage layer for the request ledger and ingestion queue.
//!
//! [`Storage`] holds only the database path and environment selector.
//! Every operation opens and closes its own connection: the ledger insert,
//! the queue insert, and the status update are three independent commits
//! with no ambient transaction spanning them. Concurrency control is left
//! entirely to the database.
//!
//! The environment selector picks `_dev`-suffixed table names in test mode
//! so production tables are never touched from a test configuration.

mod migrations;

use std::path::{Path, PathBuf};

use brandgate_shared::{
    BrandGateError, Environment, QueueEntry, RequestId, RequestStatus, Result, SubjectKind,
    SubmissionRequest,
};
use libsql::{Connection, Database, params};

/// Storage handle for the ledger and queue tables.
pub struct Storage {
    db_path: PathBuf,
    env: Environment,
}

impl Storage {
    /// Open or create a database at `path` and apply pending migrations
    /// for `env`.
    pub async fn open(path: &Path, env: Environment) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BrandGateError::io(parent, e))?;
        }

        let storage = Self {
            db_path: path.to_path_buf(),
            env,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// The environment this handle writes to.
    pub fn environment(&self) -> Environment {
        self.env
    }

    /// Ledger table name for the active environment.
    fn ledger_table(&self) -> String {
        format!("submission_requests{}", self.env.table_suffix())
    }

    /// Queue table name for the active environment.
    fn queue_table(&self) -> String {
        format!("ingestion_queue{}", self.env.table_suffix())
    }

    /// Open a fresh connection. The `Database` handle is returned alongside
    /// the connection so it stays alive for the duration of the operation.
    async fn connect(&self) -> Result<(Database, Connection)> {
        let db = libsql::Builder::new_local(&self.db_path)
            .build()
            .await
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;

        Ok((db, conn))
    }

    /// Run pending schema migrations for the active environment.
    async fn run_migrations(&self) -> Result<()> {
        let (_db, conn) = self.connect().await?;
        let current_version = get_schema_version(&conn, self.env).await;

        for migration in migrations::all_migrations(self.env) {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    environment = self.env.as_str(),
                    description = migration.description,
                    "applying migration"
                );
                conn.execute_batch(&migration.sql).await.map_err(|e| {
                    BrandGateError::Storage(format!(
                        "migration v{} failed: {e}",
                        migration.version
                    ))
                })?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ledger operations
    // -----------------------------------------------------------------------

    /// Insert one ledger row. Never updates; the ledger is append-only
    /// apart from the status column.
    pub async fn insert_request(&self, req: &SubmissionRequest) -> Result<()> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "INSERT INTO {} (request_id, subject_kind, subject_value, secondary_value,
                             request_type, requestor_name, requestor_email,
                             is_multi, status, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            self.ledger_table()
        );
        conn.execute(
            &sql,
            params![
                req.request_id.to_string(),
                req.subject_kind.as_str(),
                req.subject_value.as_str(),
                req.secondary_value.as_deref(),
                req.request_type.as_str(),
                req.requestor_name.as_str(),
                req.requestor_email.as_str(),
                req.is_multi as i64,
                req.status.code(),
                req.submitted_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Advance every ledger row sharing `request_id` to `status`.
    /// Returns the number of rows updated.
    pub async fn update_status_by_request(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<u64> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "UPDATE {} SET status = ?1 WHERE request_id = ?2",
            self.ledger_table()
        );
        let updated = conn
            .execute(&sql, params![status.code(), request_id.to_string()])
            .await
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;
        Ok(updated)
    }

    /// All ledger rows for one submission batch, in insertion order.
    pub async fn requests_by_id(&self, request_id: &RequestId) -> Result<Vec<SubmissionRequest>> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "SELECT request_id, subject_kind, subject_value, secondary_value,
                    request_type, requestor_name, requestor_email,
                    is_multi, status, submitted_at
             FROM {} WHERE request_id = ?1 ORDER BY id",
            self.ledger_table()
        );
        let mut rows = conn
            .query(&sql, params![request_id.to_string()])
            .await
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_request(&row)?);
        }
        Ok(results)
    }

    /// Most recent ledger rows, newest first.
    pub async fn recent_requests(&self, limit: u32) -> Result<Vec<SubmissionRequest>> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "SELECT request_id, subject_kind, subject_value, secondary_value,
                    request_type, requestor_name, requestor_email,
                    is_multi, status, submitted_at
             FROM {} ORDER BY submitted_at DESC, id DESC LIMIT ?1",
            self.ledger_table()
        );
        let mut rows = conn
            .query(&sql, params![limit as i64])
            .await
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_request(&row)?);
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Queue operations
    // -----------------------------------------------------------------------

    /// Insert one ingestion queue row at pending status. The workflow never
    /// updates queue rows after insert; downstream automation owns them.
    pub async fn insert_queue_entry(&self, entry: &QueueEntry) -> Result<()> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "INSERT INTO {} (query_type, query_value, request_id, status, written_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            self.queue_table()
        );
        conn.execute(
            &sql,
            params![
                entry.query_type.as_str(),
                entry.query_value.as_str(),
                entry.request_id.to_string(),
                entry.written_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;
        Ok(())
    }

    /// All queue rows for one submission batch, in insertion order.
    pub async fn queue_entries_by_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<QueueEntry>> {
        let (_db, conn) = self.connect().await?;
        let sql = format!(
            "SELECT query_type, query_value, request_id, written_at
             FROM {} WHERE request_id = ?1 ORDER BY id",
            self.queue_table()
        );
        let mut rows = conn
            .query(&sql, params![request_id.to_string()])
            .await
            .map_err(|e| BrandGateError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_queue_entry(&row)?);
        }
        Ok(results)
    }
}

/// Read the current schema version for `env`, or 0 before first migration.
async fn get_schema_version(conn: &Connection, env: Environment) -> u32 {
    let result = conn
        .query(
            "SELECT MAX(version) FROM schema_migrations WHERE environment = ?1",
            params![env.as_str()],
        )
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

/// Convert a ledger row to a [`SubmissionRequest`].
fn row_to_request(row: &libsql::Row) -> Result<SubmissionRequest> {
    let request_id: String = row
        .get(0)
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;
    let kind: String = row
        .get(1)
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;
    let status_code: i64 = row
        .get(8)
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;

    Ok(SubmissionRequest {
        request_id: request_id
            .parse()
            .map_err(|e| BrandGateError::Storage(format!("invalid request_id: {e}")))?,
        subject_kind: SubjectKind::parse(&kind)
            .ok_or_else(|| BrandGateError::Storage(format!("unknown subject kind: {kind}")))?,
        subject_value: row
            .get::<String>(2)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        secondary_value: row.get::<String>(3).ok(),
        request_type: row
            .get::<String>(4)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        requestor_name: row
            .get::<String>(5)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        requestor_email: row
            .get::<String>(6)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        is_multi: row
            .get::<i64>(7)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?
            != 0,
        status: RequestStatus::from_code(status_code)
            .ok_or_else(|| BrandGateError::Storage(format!("unknown status code: {status_code}")))?,
        submitted_at: parse_timestamp(row, 9)?,
    })
}

/// Convert a queue row to a [`QueueEntry`].
fn row_to_queue_entry(row: &libsql::Row) -> Result<QueueEntry> {
    let request_id: String = row
        .get(2)
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;

    Ok(QueueEntry {
        query_type: row
            .get::<String>(0)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        query_value: row
            .get::<String>(1)
            .map_err(|e| BrandGateError::Storage(e.to_string()))?,
        request_id: request_id
            .parse()
            .map_err(|e| BrandGateError::Storage(format!("invalid request_id: {e}")))?,
        written_at: parse_timestamp(row, 3)?,
    })
}

/// Parse an RFC 3339 timestamp column.
fn parse_timestamp(row: &libsql::Row, idx: i32) -> Result<chrono::DateTime<chrono::Utc>> {
    let s: String = row
        .get(idx)
        .map_err(|e| BrandGateError::Storage(e.to_string()))?;
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| BrandGateError::Storage(format!("invalid date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("bg_test_{}.db", Uuid::now_v7()))
    }

    /// Create a temp file storage in the test environment.
    async fn test_storage() -> Storage {
        Storage::open(&test_db_path(), Environment::Test)
            .await
            .expect("open test db")
    }

    fn sample_request(request_id: &RequestId, subject: &str, is_multi: bool) -> SubmissionRequest {
        SubmissionRequest {
            request_id: request_id.clone(),
            subject_kind: SubjectKind::Brand,
            subject_value: subject.into(),
            secondary_value: None,
            request_type: "Amazon Brand Name".into(),
            requestor_name: "Alice".into(),
            requestor_email: "alice@example.com".into(),
            is_multi,
            status: RequestStatus::Created,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn open_and_migrate() {
        let storage = test_storage().await;
        let (_db, conn) = storage.connect().await.unwrap();
        let version = get_schema_version(&conn, Environment::Test).await;
        assert_eq!(version, 1);
    }

    #[tokio::test]
    async fn idempotent_migration() {
        let path = test_db_path();
        let s1 = Storage::open(&path, Environment::Test).await.expect("first open");
        drop(s1);
        let s2 = Storage::open(&path, Environment::Test).await.expect("second open");
        let (_db, conn) = s2.connect().await.unwrap();
        assert_eq!(get_schema_version(&conn, Environment::Test).await, 1);
    }

    #[tokio::test]
    async fn environments_are_isolated() {
        let path = test_db_path();
        let test_env = Storage::open(&path, Environment::Test).await.unwrap();
        let prod_env = Storage::open(&path, Environment::Prod).await.unwrap();

        let request_id = RequestId::new();
        test_env
            .insert_request(&sample_request(&request_id, "Nike", false))
            .await
            .expect("insert into test tables");

        // The same request_id is invisible through the prod-suffixed tables.
        let in_prod = prod_env.requests_by_id(&request_id).await.unwrap();
        assert!(in_prod.is_empty());
        let in_test = test_env.requests_by_id(&request_id).await.unwrap();
        assert_eq!(in_test.len(), 1);
    }

    #[tokio::test]
    async fn insert_and_read_back_request() {
        let storage = test_storage().await;
        let request_id = RequestId::new();

        let req = SubmissionRequest {
            subject_kind: SubjectKind::Company,
            subject_value: "Acme Corp".into(),
            secondary_value: Some("ACME-LEADLIST-7".into()),
            request_type: "Amazon Company Name".into(),
            ..sample_request(&request_id, "Acme Corp", false)
        };
        storage.insert_request(&req).await.expect("insert request");

        let rows = storage.requests_by_id(&request_id).await.expect("read back");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_kind, SubjectKind::Company);
        assert_eq!(rows[0].secondary_value.as_deref(), Some("ACME-LEADLIST-7"));
        assert_eq!(rows[0].status, RequestStatus::Created);
        assert!(!rows[0].is_multi);
    }

    #[tokio::test]
    async fn status_update_covers_whole_batch() {
        let storage = test_storage().await;
        let request_id = RequestId::new();

        for subject in ["Nike", "Adidas", "Puma"] {
            storage
                .insert_request(&sample_request(&request_id, subject, true))
                .await
                .unwrap();
        }

        let updated = storage
            .update_status_by_request(&request_id, RequestStatus::QueuedForProcessing)
            .await
            .expect("update status");
        assert_eq!(updated, 3);

        let rows = storage.requests_by_id(&request_id).await.unwrap();
        assert!(rows
            .iter()
            .all(|r| r.status == RequestStatus::QueuedForProcessing));
    }

    #[tokio::test]
    async fn queue_entry_roundtrip() {
        let storage = test_storage().await;
        let request_id = RequestId::new();

        let entry = QueueEntry {
            query_type: "walmart_brand".into(),
            query_value: "Nike".into(),
            request_id: request_id.clone(),
            written_at: Utc::now(),
        };
        storage.insert_queue_entry(&entry).await.expect("insert queue entry");

        let entries = storage
            .queue_entries_by_request(&request_id)
            .await
            .expect("read queue entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query_type, "walmart_brand");
        assert_eq!(entries[0].query_value, "Nike");
    }

    #[tokio::test]
    async fn recent_requests_newest_first() {
        let storage = test_storage().await;

        let first = RequestId::new();
        let second = RequestId::new();
        let mut older = sample_request(&first, "OldBrand", false);
        older.submitted_at = Utc::now() - chrono::Duration::minutes(5);
        storage.insert_request(&older).await.unwrap();
        storage
            .insert_request(&sample_request(&second, "NewBrand", false))
            .await
            .unwrap();

        let recent = storage.recent_requests(10).await.expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].subject_value, "NewBrand");
        assert_eq!(recent[1].subject_value, "OldBrand");

        let limited = storage.recent_requests(1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}
