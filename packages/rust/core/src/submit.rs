//! The submission workflow: one validated user action becomes a ledger
//! batch, a set of queue rows, a status advance, and a notification.
//!
//! Sequencing per batch:
//! 1. validate → 2. assign one request_id → 3. classify →
//! 4. ledger inserts at `Created` → 5. queue inserts →
//! 6. advance the whole batch to `QueuedForProcessing` →
//! 7. best-effort notification.
//!
//! The ledger and queue writes are independent commits. A queue failure
//! marks the batch `Failed` but never rolls back ledger rows; that
//! divergence is accepted and visible in the stored status.

use chrono::Utc;
use tracing::{info, instrument, warn};

use brandgate_notify::Notify;
use brandgate_shared::{
    BrandGateError, Channel, CompanyCandidate, Provenance, QueueEntry, RequestId, RequestStatus,
    Requestor, Result, SubjectKind, SubmissionRequest,
};

use crate::classify;
use crate::store::{IngestionQueue, RequestLedger};
use crate::validate;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Request-scoped context: who is submitting, plus the directory results
/// already fetched for them. Replaces any notion of ambient session state.
#[derive(Debug, Clone)]
pub struct SubmitContext {
    /// Attribution recorded on every ledger row.
    pub requestor: Requestor,
    /// Cached company candidates from the most recent directory lookup.
    /// Company subjects must resolve against these; the workflow never
    /// re-queries the directory.
    pub companies: Vec<CompanyCandidate>,
}

impl SubmitContext {
    pub fn new(requestor: Requestor) -> Self {
        Self {
            requestor,
            companies: Vec::new(),
        }
    }

    pub fn with_companies(requestor: Requestor, companies: Vec<CompanyCandidate>) -> Self {
        Self {
            requestor,
            companies,
        }
    }

    /// Find a cached company candidate by display name.
    fn find_company(&self, name: &str) -> Option<&CompanyCandidate> {
        self.companies.iter().find(|c| c.name == name)
    }
}

/// One channel's worth of subjects submitted together.
#[derive(Debug, Clone)]
pub struct SubmissionBatch {
    /// Raw subject inputs. Entries may be semicolon-joined; they are split
    /// before any further processing.
    pub subjects: Vec<String>,
    pub kind: SubjectKind,
    pub channel: Channel,
    pub provenance: Provenance,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Per-subject result within a batch.
#[derive(Debug, Clone)]
pub struct SubjectOutcome {
    /// The subject as recorded in the ledger (company display name for
    /// Company subjects).
    pub subject: String,
    /// Whether this subject's queue row was written.
    pub queued: bool,
}

/// Result of submitting one batch.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Identifier shared by every row of the batch.
    pub request_id: RequestId,
    /// Final ledger status of the batch.
    pub status: RequestStatus,
    /// Per-subject results, in submission order.
    pub subjects: Vec<SubjectOutcome>,
    /// Description of the first storage failure, if any.
    pub failure: Option<String>,
    /// Whether the notification was confirmed delivered.
    pub notified: bool,
}

impl SubmitOutcome {
    /// True when every subject reached the queue.
    pub fn fully_queued(&self) -> bool {
        self.status == RequestStatus::QueuedForProcessing
    }
}

/// Result of one channel within a multi-channel submission.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub result: Result<SubmitOutcome>,
}

/// Result of a multi-channel submission.
#[derive(Debug)]
pub struct MultiChannelOutcome {
    pub channels: Vec<ChannelOutcome>,
    /// Whether the combined notification was confirmed delivered.
    pub notified: bool,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Submit one batch and notify the requestor on success.
#[instrument(skip_all, fields(kind = ?batch.kind, channel = ?batch.channel, inputs = batch.subjects.len()))]
pub async fn submit<L, Q, N>(
    ctx: &SubmitContext,
    batch: &SubmissionBatch,
    ledger: &L,
    queue: &Q,
    notifier: &N,
) -> Result<SubmitOutcome>
where
    L: RequestLedger,
    Q: IngestionQueue,
    N: Notify,
{
    let mut outcome = run_batch(ctx, batch, ledger, queue).await?;

    if outcome.fully_queued() {
        let summary = outcome
            .subjects
            .iter()
            .map(|s| s.subject.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        outcome.notified = notifier.notify(&summary, &ctx.requestor.email).await;
        if !outcome.notified {
            warn!(request_id = %outcome.request_id, "notification not delivered");
        }
    }

    Ok(outcome)
}

/// Submit several channels' batches independently, then send one combined
/// notification covering every channel that succeeded.
///
/// A failure in one channel never aborts the others; each channel gets its
/// own request_id and its own outcome.
#[instrument(skip_all, fields(channels = batches.len()))]
pub async fn submit_channels<L, Q, N>(
    ctx: &SubmitContext,
    batches: &[SubmissionBatch],
    ledger: &L,
    queue: &Q,
    notifier: &N,
) -> Result<MultiChannelOutcome>
where
    L: RequestLedger,
    Q: IngestionQueue,
    N: Notify,
{
    // Reject up front so a bad address doesn't fail channel-by-channel.
    validate::validate_email(&ctx.requestor.email)?;

    let mut channels = Vec::with_capacity(batches.len());
    let mut sections: Vec<String> = Vec::new();

    for batch in batches {
        let result = run_batch(ctx, batch, ledger, queue).await;

        if let Ok(outcome) = &result {
            if outcome.fully_queued() {
                let values = outcome
                    .subjects
                    .iter()
                    .map(|s| s.subject.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                sections.push(format!("{}: {values}", batch.channel.display_name()));
            }
        } else if let Err(e) = &result {
            warn!(channel = ?batch.channel, error = %e, "channel submission failed");
        }

        channels.push(ChannelOutcome {
            channel: batch.channel,
            result,
        });
    }

    let notified = if sections.is_empty() {
        false
    } else {
        notifier
            .notify(&sections.join(" | "), &ctx.requestor.email)
            .await
    };

    Ok(MultiChannelOutcome { channels, notified })
}

// ---------------------------------------------------------------------------
// Batch execution
// ---------------------------------------------------------------------------

/// A subject after splitting and company resolution, ready to write.
struct ResolvedSubject {
    /// Ledger subject_value (display name for companies).
    value: String,
    /// Ledger secondary_value (lead-list name for companies).
    secondary: Option<String>,
    /// Queue query_value.
    query_value: String,
}

/// Validate, resolve, and write one batch. No notification here.
async fn run_batch<L, Q>(
    ctx: &SubmitContext,
    batch: &SubmissionBatch,
    ledger: &L,
    queue: &Q,
) -> Result<SubmitOutcome>
where
    L: RequestLedger,
    Q: IngestionQueue,
{
    // --- Validation: nothing is written past this section ---
    validate::validate_email(&ctx.requestor.email)?;

    let subjects = expand_subjects(&batch.subjects);
    if subjects.is_empty() {
        return Err(BrandGateError::EmptyBatch);
    }

    if batch.kind == SubjectKind::RetailerUrl {
        for subject in &subjects {
            validate::validate_url(subject)?;
        }
    }

    let resolved = resolve_subjects(ctx, batch.kind, &subjects)?;

    // --- Classification and identifier assignment ---
    let request_id = RequestId::new();
    let is_multi = resolved.len() > 1;
    let request_type = classify::request_type(batch.kind, batch.channel, batch.provenance);
    let query_type = classify::query_type(batch.kind, batch.channel);

    info!(
        %request_id,
        request_type = %request_type,
        subjects = resolved.len(),
        is_multi,
        "submitting batch"
    );

    // --- Ledger inserts, one row per subject, all at Created ---
    for subject in &resolved {
        let row = SubmissionRequest {
            request_id: request_id.clone(),
            subject_kind: batch.kind,
            subject_value: subject.value.clone(),
            secondary_value: subject.secondary.clone(),
            request_type: request_type.clone(),
            requestor_name: ctx.requestor.name.clone(),
            requestor_email: ctx.requestor.email.clone(),
            is_multi,
            status: RequestStatus::Created,
            submitted_at: Utc::now(),
        };
        ledger
            .insert_request(&row)
            .await
            .map_err(|e| tag_storage(e, "ledger", &subject.value))?;
    }

    // --- Queue inserts; the first failure fails the whole batch ---
    let mut queued = 0usize;
    let mut failure: Option<String> = None;

    for subject in &resolved {
        let entry = QueueEntry {
            query_type: query_type.to_string(),
            query_value: subject.query_value.clone(),
            request_id: request_id.clone(),
            written_at: Utc::now(),
        };
        match queue.insert_entry(&entry).await {
            Ok(()) => queued += 1,
            Err(e) => {
                let e = tag_storage(e, "queue", &subject.value);
                warn!(%request_id, error = %e, "queue insert failed, batch will not be processed");
                failure = Some(e.to_string());
                break;
            }
        }
    }

    // --- Status advance, batch-wide; there is no per-subject granularity ---
    let status = if failure.is_none() {
        ledger
            .update_status(&request_id, RequestStatus::QueuedForProcessing)
            .await
            .map_err(|e| tag_storage(e, "ledger", "status update"))?;
        RequestStatus::QueuedForProcessing
    } else {
        // Ledger rows are deliberately not rolled back; mark them so
        // stalled batches are distinguishable from in-flight ones.
        if let Err(e) = ledger.update_status(&request_id, RequestStatus::Failed).await {
            warn!(%request_id, error = %e, "failed to record Failed status");
        }
        RequestStatus::Failed
    };

    let subjects = resolved
        .iter()
        .enumerate()
        .map(|(i, s)| SubjectOutcome {
            subject: s.value.clone(),
            queued: i < queued,
        })
        .collect();

    Ok(SubmitOutcome {
        request_id,
        status,
        subjects,
        failure,
        notified: false,
    })
}

/// Split semicolon-joined inputs, trim, and drop empties.
fn expand_subjects(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|s| s.split(';'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolve subjects against the cached directory results. Company misses
/// reject the whole batch before any write.
fn resolve_subjects(
    ctx: &SubmitContext,
    kind: SubjectKind,
    subjects: &[String],
) -> Result<Vec<ResolvedSubject>> {
    subjects
        .iter()
        .map(|subject| match kind {
            SubjectKind::Company => {
                let candidate = ctx
                    .find_company(subject)
                    .ok_or_else(|| BrandGateError::CompanyNotFound(subject.clone()))?;
                Ok(ResolvedSubject {
                    value: candidate.name.clone(),
                    secondary: Some(candidate.lead_list_name.clone()),
                    query_value: candidate.lead_list_name.clone(),
                })
            }
            SubjectKind::Brand | SubjectKind::RetailerUrl => Ok(ResolvedSubject {
                value: subject.clone(),
                secondary: None,
                query_value: subject.clone(),
            }),
        })
        .collect()
}

/// Prefix a storage error with the table and subject that failed.
fn tag_storage(e: BrandGateError, table: &str, subject: &str) -> BrandGateError {
    match e {
        BrandGateError::Storage(msg) => {
            BrandGateError::Storage(format!("{table} write for '{subject}': {msg}"))
        }
        other => other,
    }
}
