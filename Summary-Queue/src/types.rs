use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EnrichError;

/// User-facing text stored with every failed task unless configured otherwise.
pub const FAILURE_MESSAGE: &str = "Failed to generate summary. Please try again.";

/// Detail stored when a claimed call is dropped before it produced an outcome.
pub const CANCELLED_DETAIL: &str = "Request cancelled";

/// Payload produced by a successful enrichment.
///
/// The only constructor, [`EnrichmentResult::new`], guarantees that
/// `reviews_processed <= reviews_available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    summary: String,
    reviews_processed: u32,
    reviews_available: u32,
    model: Option<String>,
    note: Option<String>,
}

impl EnrichmentResult {
    pub fn new(
        summary: impl Into<String>,
        reviews_processed: u32,
        reviews_available: u32,
    ) -> Result<Self, EnrichError> {
        if reviews_processed > reviews_available {
            return Err(EnrichError::InvalidResponse(format!(
                "processed {} reviews but only {} are available",
                reviews_processed, reviews_available
            )));
        }
        Ok(Self {
            summary: summary.into(),
            reviews_processed,
            reviews_available,
            model: None,
            note: None,
        })
    }

    /// Set the model identifier reported by the service (builder pattern).
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Attach an advisory note, e.g. that a fallback summarizer was used.
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn reviews_processed(&self) -> u32 {
        self.reviews_processed
    }

    pub fn reviews_available(&self) -> u32 {
        self.reviews_available
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Why a task ended up `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFailure {
    /// Text shown to the user next to the retry action.
    pub message: String,
    /// Underlying transport or server detail, if any.
    pub detail: Option<String>,
}

impl TaskFailure {
    pub fn new(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            message: message.into(),
            detail,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Per-key state lifecycle: Idle/Failed -> Pending -> Ready/Failed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum TaskState {
    #[default]
    Idle,
    Pending,
    Ready(EnrichmentResult),
    Failed(TaskFailure),
}

impl TaskState {
    pub fn is_idle(&self) -> bool {
        matches!(self, TaskState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TaskState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TaskState::Failed(_))
    }

    /// Ready or Failed.
    pub fn is_terminal(&self) -> bool {
        self.is_ready() || self.is_failed()
    }

    pub fn result(&self) -> Option<&EnrichmentResult> {
        match self {
            TaskState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            TaskState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Pending => "pending",
            TaskState::Ready(_) => "ready",
            TaskState::Failed(_) => "failed",
        }
    }
}

/// Which prior states may be moved to `Pending` by a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimPolicy {
    /// Only never-requested keys. Used by batch runs, which do not retry.
    IdleOnly,
    /// Idle keys and keys whose last request failed. Used by manual requests.
    RetryFailed,
}

impl ClaimPolicy {
    pub fn allows(&self, state: &TaskState) -> bool {
        match self {
            ClaimPolicy::IdleOnly => state.is_idle(),
            ClaimPolicy::RetryFailed => state.is_idle() || state.is_failed(),
        }
    }
}

/// Summary of a finished (or cancelled) batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: String,
    /// Keys submitted to the run.
    pub requested: usize,
    /// Keys that were Idle when the run started.
    pub eligible: usize,
    /// Keys for which a call was actually made.
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Eligible keys passed over because they were claimed elsewhere or not ready.
    pub skipped: usize,
    /// Eligible keys never reached because the run was cancelled.
    pub remaining: usize,
    pub cancelled: bool,
    pub total_duration_ms: u64,
    pub avg_duration_ms: u64,
    /// RFC 3339 timestamp when the run started.
    pub started_at: String,
    /// RFC 3339 timestamp when the run stopped.
    pub completed_at: String,
}
