//! # Summary Queue
//!
//! Sequential, rate-limited enrichment of keyed items with an observable
//! per-key state store.
//!
//! ## Key Features
//!
//! - **One call at a time**: batch runs dispatch strictly in order with a
//!   configurable pause between calls, so a slow remote model is never
//!   flooded
//! - **Per-key lifecycle**: every key moves Idle -> Pending -> Ready/Failed,
//!   and failed keys can be retried individually
//! - **Change notification**: subscribe to one key or all of them
//! - **Idempotent requests**: keys that are pending or ready are never
//!   requested twice
//! - **Cancellable batches**: cancellation stops a run after its in-flight
//!   call and leaves the remaining keys Idle
//!
//! ## Quick Start
//!
//! 1. Implement [`Enricher`] for your remote call
//! 2. Create a [`SummaryController`] with a [`RunnerConfig`]
//! 3. Subscribe to state changes and call
//!    [`request_one`](SummaryController::request_one) or
//!    [`request_all`](SummaryController::request_all)

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod runner;
pub mod store;
pub mod types;

pub use config::{RunnerConfig, RunnerConfigBuilder};
pub use controller::SummaryController;
pub use error::{EnrichError, QueueError};
pub use events::StateChange;
pub use runner::{CancelSignal, SequentialRunner, TaskKey};
pub use store::{Subscription, TaskStore};
pub use types::{
    BatchSummary, ClaimPolicy, EnrichmentResult, TaskFailure, TaskState, CANCELLED_DETAIL,
    FAILURE_MESSAGE,
};

/// The remote call that turns a key into an [`EnrichmentResult`].
///
/// # Example
///
/// ```ignore
/// use summary_queue::*;
///
/// struct Echo;
///
/// impl Enricher<u32> for Echo {
///     async fn enrich(&self, key: &u32) -> Result<EnrichmentResult, EnrichError> {
///         EnrichmentResult::new(format!("item {}", key), 1, 1)
///     }
/// }
/// ```
pub trait Enricher<K>: Send + Sync + 'static {
    /// Perform the call. Timeouts are applied by the runner.
    fn enrich(
        &self,
        key: &K,
    ) -> impl std::future::Future<Output = Result<EnrichmentResult, EnrichError>> + Send;

    /// Reject a key before anything is claimed or sent.
    ///
    /// Return [`EnrichError::Precondition`] for keys that can never succeed,
    /// such as an item with nothing to summarize. The default accepts all keys.
    fn check_ready(&self, _key: &K) -> Result<(), EnrichError> {
        Ok(())
    }
}
