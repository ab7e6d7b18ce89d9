//! Trait seams over the ledger and queue tables.
//!
//! The workflow sequences writes through these traits rather than the
//! concrete [`Storage`] type, so storage failures can be exercised in tests
//! without a broken database.

use brandgate_shared::{QueueEntry, RequestId, RequestStatus, Result, SubmissionRequest};
use brandgate_storage::Storage;

/// Append-only request ledger with a mutable status column.
pub trait RequestLedger {
    /// Insert one ledger row.
    fn insert_request(&self, req: &SubmissionRequest) -> impl Future<Output = Result<()>> + Send;

    /// Advance every row sharing `request_id` to `status`.
    fn update_status(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Append-only ingestion queue polled by downstream automation.
pub trait IngestionQueue {
    /// Insert one queue row at pending status.
    fn insert_entry(&self, entry: &QueueEntry) -> impl Future<Output = Result<()>> + Send;
}

impl RequestLedger for Storage {
    async fn insert_request(&self, req: &SubmissionRequest) -> Result<()> {
        Storage::insert_request(self, req).await
    }

    async fn update_status(&self, request_id: &RequestId, status: RequestStatus) -> Result<u64> {
        self.update_status_by_request(request_id, status).await
    }
}

impl IngestionQueue for Storage {
    async fn insert_entry(&self, entry: &QueueEntry) -> Result<()> {
        self.insert_queue_entry(entry).await
    }
}
