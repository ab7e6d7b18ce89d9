//! Core domain types for BrandGate submission requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for submission batch identifiers (time-sortable).
///
/// One `RequestId` is shared by every ledger and queue row belonging to the
/// same submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Generate a new time-sortable request identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Subject classification
// ---------------------------------------------------------------------------

/// What kind of thing a subject string names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A brand display name.
    Brand,
    /// A company display name, resolved against directory results.
    Company,
    /// A retailer product/brand page URL (Home Depot, Lowes).
    RetailerUrl,
}

impl SubjectKind {
    /// Stable string form stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Company => "company",
            Self::RetailerUrl => "retailer_url",
        }
    }

    /// Parse the stored string form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brand" => Some(Self::Brand),
            "company" => Some(Self::Company),
            "retailer_url" => Some(Self::RetailerUrl),
            _ => None,
        }
    }
}

/// Target retailer context for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Amazon,
    Walmart,
    Target,
    HomeDepot,
    Lowes,
}

impl Channel {
    /// Compact label used in request_type strings ("HomeDepot Brand").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::Walmart => "Walmart",
            Self::Target => "Target",
            Self::HomeDepot => "HomeDepot",
            Self::Lowes => "Lowes",
        }
    }

    /// Human-readable name used in notification summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HomeDepot => "Home Depot",
            other => other.label(),
        }
    }

    /// HomeDepot and Lowes submissions are URL-only; they have no
    /// manually-entered "New" variant.
    pub fn is_url_only(&self) -> bool {
        matches!(self, Self::HomeDepot | Self::Lowes)
    }
}

/// Whether a subject came from the directory lookup or was typed in
/// manually as not-found input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Selected from directory lookup results.
    Directory,
    /// Manually entered ("not in directory").
    Manual,
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a ledger row.
///
/// Stored as an integer code. `Failed` is written when a queue insert fails
/// for any subject in the batch, so stalled requests are distinguishable
/// from ones that were never queued at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Ledger row written; queue insert not yet confirmed.
    Created,
    /// All queue inserts for the batch succeeded.
    QueuedForProcessing,
    /// A queue insert failed; the batch will not be processed.
    Failed,
}

impl RequestStatus {
    /// Integer code persisted in the ledger.
    pub fn code(&self) -> i64 {
        match self {
            Self::Created => 0,
            Self::QueuedForProcessing => 2,
            Self::Failed => 3,
        }
    }

    /// Decode a persisted status code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Created),
            2 => Some(Self::QueuedForProcessing),
            3 => Some(Self::Failed),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Runtime environment selector; test mode writes to `_dev`-suffixed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    Test,
}

impl Environment {
    /// Suffix appended to both table names for this environment.
    pub fn table_suffix(&self) -> &'static str {
        match self {
            Self::Prod => "",
            Self::Test => "_dev",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Test => "test",
        }
    }
}

// ---------------------------------------------------------------------------
// Requestor
// ---------------------------------------------------------------------------

/// Attribution for a submission, carried per-request instead of in any
/// global session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requestor {
    /// Display name recorded on each ledger row.
    pub name: String,
    /// Email address; must pass format validation before any write.
    pub email: String,
}

// ---------------------------------------------------------------------------
// SubmissionRequest (ledger row)
// ---------------------------------------------------------------------------

/// One ledger row per subject submitted. Rows from the same batch share
/// `request_id`, `request_type`, attribution, and `is_multi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Batch identifier shared across the whole submission.
    pub request_id: RequestId,
    /// Classification of the subject string.
    pub subject_kind: SubjectKind,
    /// Brand name, company display name, or retailer URL.
    pub subject_value: String,
    /// Associated attribute; the lead-list name for Company subjects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<String>,
    /// Descriptive label combining channel and provenance.
    pub request_type: String,
    /// Requestor display name.
    pub requestor_name: String,
    /// Requestor email (validated before insertion).
    pub requestor_email: String,
    /// True iff the batch contains more than one subject.
    pub is_multi: bool,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Insertion timestamp; immutable after the row is written.
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// QueueEntry (ingestion queue row)
// ---------------------------------------------------------------------------

/// One ingestion queue row per subject that reaches queuing. Downstream
/// automation polls this table; the workflow never updates it after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Classification consumed by the downstream poller
    /// ("brand", "manufacturer_only", "walmart_brand", ...).
    pub query_type: String,
    /// The value to query: lead-list name for companies, otherwise the
    /// subject string (the URL for Home Depot / Lowes).
    pub query_value: String,
    /// Originating batch identifier.
    pub request_id: RequestId,
    /// Insertion timestamp.
    pub written_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CompanyCandidate
// ---------------------------------------------------------------------------

/// A company record returned by the directory lookup.
///
/// `lead_list_name` is the field actually persisted as `secondary_value`
/// and `query_value` — never the display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCandidate {
    /// Directory-internal company identifier.
    pub id: String,
    /// Company display name shown to the requestor.
    pub name: String,
    /// Raw concatenated list name.
    pub list_name: String,
    /// Final lead-list name; the value downstream automation consumes.
    pub lead_list_name: String,
}
