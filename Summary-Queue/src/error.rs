use thiserror::Error;

/// Failure of a single enrichment call.
///
/// Any variant returned from [`Enricher::enrich`](crate::Enricher::enrich) is
/// stored as a `Failed` task state. A [`EnrichError::Precondition`] returned
/// from [`Enricher::check_ready`](crate::Enricher::check_ready) rejects the key
/// before it is claimed, so it never reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    #[error("Request timed out")]
    Timeout,

    #[error("Remote service returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Cannot reach remote service: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Precondition(String),
}

/// Errors returned by the controller's entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("A batch run is already active")]
    BatchActive,

    #[error("Key {0} is already pending or ready")]
    AlreadyRequested(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("No Tokio runtime available to run the request")]
    NoRuntime,
}
