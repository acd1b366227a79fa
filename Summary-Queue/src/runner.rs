use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::error::{EnrichError, QueueError};
use crate::store::TaskStore;
use crate::types::{BatchSummary, ClaimPolicy, TaskFailure, TaskState, CANCELLED_DETAIL};
use crate::Enricher;

/// Bounds every task key must satisfy.
pub trait TaskKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> TaskKey for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Cooperative cancellation flag that also wakes sleepers.
#[derive(Debug, Default)]
pub struct CancelSignal {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless cancelled first. Returns `true` if cancelled.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a cancel in between still wakes us
        notified.as_mut().enable();
        if self.is_cancelled() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_cancelled(),
            _ = &mut notified => true,
        }
    }
}

/// Ownership of a key that has been moved to `Pending`.
///
/// Dropping an unsettled claim marks the key `Failed`, so a call whose future
/// is dropped or aborted never leaves the key stuck in `Pending`.
pub(crate) struct Claim<K: TaskKey> {
    store: Arc<TaskStore<K>>,
    key: K,
    failure_message: String,
    settled: bool,
}

impl<K: TaskKey> Claim<K> {
    fn new(store: &Arc<TaskStore<K>>, key: K, failure_message: &str) -> Self {
        Self {
            store: Arc::clone(store),
            key,
            failure_message: failure_message.to_string(),
            settled: false,
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    fn settle(mut self, state: TaskState) {
        self.settled = true;
        self.store.set(self.key.clone(), state);
    }
}

impl<K: TaskKey> Drop for Claim<K> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(key = ?self.key, "Enrichment dropped before completion");
        self.store.set(
            self.key.clone(),
            TaskState::Failed(TaskFailure::new(
                self.failure_message.clone(),
                Some(CANCELLED_DETAIL.to_string()),
            )),
        );
    }
}

/// Runs enrichment calls one at a time, writing every outcome to the store.
pub struct SequentialRunner<K, E> {
    store: Arc<TaskStore<K>>,
    enricher: Arc<E>,
    config: RunnerConfig,
}

impl<K, E> SequentialRunner<K, E>
where
    K: TaskKey,
    E: Enricher<K>,
{
    pub fn new(store: Arc<TaskStore<K>>, enricher: Arc<E>, config: RunnerConfig) -> Self {
        Self {
            store,
            enricher,
            config,
        }
    }

    pub fn store(&self) -> &Arc<TaskStore<K>> {
        &self.store
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Request a single key right away, retrying it if it previously failed.
    ///
    /// No dispatch delay applies.
    pub async fn run_one(&self, key: K) -> Result<TaskState, QueueError> {
        let claim = self.claim_one(key)?;
        Ok(self.resolve(claim).await)
    }

    /// Process every key that is `Idle` at call time, in order, one call at a
    /// time with `dispatch_delay` between calls.
    pub async fn run_all(&self, keys: &[K], cancel: &CancelSignal) -> BatchSummary {
        self.run_batch(uuid::Uuid::new_v4().to_string(), keys, cancel)
            .await
    }

    pub(crate) fn claim_one(&self, key: K) -> Result<Claim<K>, QueueError> {
        self.enricher
            .check_ready(&key)
            .map_err(|e| QueueError::Precondition(e.to_string()))?;
        if !self.store.try_claim(&key, ClaimPolicy::RetryFailed) {
            return Err(QueueError::AlreadyRequested(format!("{:?}", key)));
        }
        Ok(Claim::new(&self.store, key, &self.config.failure_message))
    }

    pub(crate) async fn run_batch(
        &self,
        batch_id: String,
        keys: &[K],
        cancel: &CancelSignal,
    ) -> BatchSummary {
        let started = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        // Work set is fixed here; keys that become Idle later are not swept in
        let eligible: Vec<K> = keys
            .iter()
            .filter(|key| self.store.get(key).is_idle())
            .cloned()
            .collect();

        info!(
            batch_id = %batch_id,
            requested = keys.len(),
            eligible = eligible.len(),
            "Starting batch run"
        );

        let mut dispatched = 0;
        let mut succeeded = 0;
        let mut failed = 0;
        let mut skipped = 0;
        let mut remaining = 0;
        let mut cancelled = false;
        let mut delay_owed = false;
        let mut durations: Vec<Duration> = Vec::new();

        for (idx, key) in eligible.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                remaining = eligible.len() - idx;
                break;
            }

            if let Err(e) = self.enricher.check_ready(key) {
                debug!(?key, error = %e, "Key not ready, skipping");
                skipped += 1;
                continue;
            }

            // One wait per dispatch; a key skipped after the wait does not owe another
            if delay_owed {
                if cancel.sleep(self.config.dispatch_delay).await {
                    cancelled = true;
                    remaining = eligible.len() - idx;
                    break;
                }
                delay_owed = false;
            }

            if !self.store.try_claim(key, ClaimPolicy::IdleOnly) {
                debug!(?key, "Key claimed elsewhere, skipping");
                skipped += 1;
                continue;
            }

            let claim = Claim::new(&self.store, key.clone(), &self.config.failure_message);
            let call_started = Instant::now();
            let state = self.resolve(claim).await;
            durations.push(call_started.elapsed());
            dispatched += 1;
            delay_owed = true;

            match state {
                TaskState::Ready(_) => succeeded += 1,
                _ => failed += 1,
            }
        }

        if cancelled {
            info!(batch_id = %batch_id, remaining, "Batch run cancelled");
        }

        let total_ms = started.elapsed().as_millis() as u64;
        let avg_ms = if durations.is_empty() {
            0
        } else {
            (durations.iter().map(|d| d.as_millis() as u64).sum::<u64>()) / durations.len() as u64
        };

        let summary = BatchSummary {
            batch_id,
            requested: keys.len(),
            eligible: eligible.len(),
            dispatched,
            succeeded,
            failed,
            skipped,
            remaining,
            cancelled,
            total_duration_ms: total_ms,
            avg_duration_ms: avg_ms,
            started_at,
            completed_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            batch_id = %summary.batch_id,
            dispatched,
            succeeded,
            failed,
            skipped,
            total_ms,
            "Batch run finished"
        );

        summary
    }

    /// Perform the call for an already-claimed key and store its outcome.
    pub(crate) async fn resolve(&self, claim: Claim<K>) -> TaskState {
        let key = claim.key();
        debug!(?key, "Dispatching enrichment");
        let state = match self.call(key).await {
            Ok(result) => {
                debug!(
                    ?key,
                    processed = result.reviews_processed(),
                    available = result.reviews_available(),
                    "Enrichment ready"
                );
                TaskState::Ready(result)
            }
            Err(e) => {
                warn!(?key, error = %e, "Enrichment failed");
                TaskState::Failed(TaskFailure::new(
                    self.config.failure_message.clone(),
                    Some(e.to_string()),
                ))
            }
        };
        claim.settle(state.clone());
        state
    }

    async fn call(&self, key: &K) -> Result<crate::EnrichmentResult, EnrichError> {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, self.enricher.enrich(key))
                .await
                .unwrap_or(Err(EnrichError::Timeout)),
            None => self.enricher.enrich(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsettled_claim_marks_key_failed() {
        let store = Arc::new(TaskStore::new());
        assert!(store.try_claim(&"a", ClaimPolicy::IdleOnly));
        drop(Claim::new(&store, "a", "boom"));
        let state = store.get(&"a");
        let failure = state.failure().unwrap();
        assert_eq!(failure.message, "boom");
        assert_eq!(failure.detail.as_deref(), Some(CANCELLED_DETAIL));

        assert!(store.try_claim(&"b", ClaimPolicy::IdleOnly));
        Claim::new(&store, "b", "boom").settle(TaskState::Idle);
        assert!(store.get(&"b").is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_runs_full_duration() {
        let signal = CancelSignal::new();
        let start = tokio::time::Instant::now();
        assert!(!signal.sleep(Duration::from_millis(500)).await);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_wakes_on_cancel() {
        let signal = Arc::new(CancelSignal::new());
        let canceller = Arc::clone(&signal);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let start = tokio::time::Instant::now();
        assert!(signal.sleep(Duration::from_secs(60)).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sleep_returns_immediately_when_already_cancelled() {
        let signal = CancelSignal::new();
        signal.cancel();
        assert!(signal.is_cancelled());
        assert!(signal.sleep(Duration::from_secs(3600)).await);
    }
}
