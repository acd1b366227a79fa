use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::RunnerConfig;
use crate::error::QueueError;
use crate::events::StateChange;
use crate::runner::{CancelSignal, SequentialRunner, TaskKey};
use crate::store::{Subscription, TaskStore};
use crate::types::{BatchSummary, TaskState};
use crate::Enricher;

struct ActiveBatch {
    id: String,
    cancel: Arc<CancelSignal>,
}

struct Inner<K, E> {
    runner: Arc<SequentialRunner<K, E>>,
    active: Mutex<Option<ActiveBatch>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry point for presentation code: observe states, request one key,
/// request many, cancel.
///
/// At most one batch run is active at a time. Cloning is cheap and every
/// clone drives the same store and runner.
pub struct SummaryController<K, E> {
    inner: Arc<Inner<K, E>>,
}

impl<K, E> Clone for SummaryController<K, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, E> SummaryController<K, E>
where
    K: TaskKey,
    E: Enricher<K>,
{
    pub fn new(enricher: E, config: RunnerConfig) -> Self {
        Self::with_store(Arc::new(TaskStore::new()), Arc::new(enricher), config)
    }

    /// Build a controller around an existing store.
    pub fn with_store(store: Arc<TaskStore<K>>, enricher: Arc<E>, config: RunnerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                runner: Arc::new(SequentialRunner::new(store, enricher, config)),
                active: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &Arc<TaskStore<K>> {
        self.inner.runner.store()
    }

    pub fn observe(&self, key: &K) -> TaskState {
        self.store().get(key)
    }

    /// Listen for writes to a single key.
    pub fn subscribe<F>(&self, key: K, listener: F) -> Subscription
    where
        F: Fn(&StateChange<K>) + Send + Sync + 'static,
    {
        self.store().subscribe(move |change| {
            if change.key == key {
                listener(change);
            }
        })
    }

    /// Listen for writes to any key.
    pub fn subscribe_all<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateChange<K>) + Send + Sync + 'static,
    {
        self.store().subscribe(listener)
    }

    pub fn is_batch_active(&self) -> bool {
        lock(&self.inner.active).is_some()
    }

    /// Claim `key` now and resolve it in the background.
    ///
    /// The key is `Pending` by the time this returns. Idle and Failed keys are
    /// accepted; Pending and Ready keys are rejected without a call. Outside a
    /// Tokio runtime this fails with [`QueueError::NoRuntime`] and the key is
    /// left untouched. Aborting the returned handle marks the key `Failed`.
    pub fn request_one(&self, key: K) -> Result<JoinHandle<TaskState>, QueueError> {
        let handle = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;
        let claim = self.inner.runner.claim_one(key)?;
        let runner = Arc::clone(&self.inner.runner);
        Ok(handle.spawn(async move { runner.resolve(claim).await }))
    }

    /// Run a batch over `keys` and wait for it to finish.
    ///
    /// Dropping the returned future stops the batch: the in-flight key is
    /// marked `Failed` and the slot is released.
    pub async fn request_all(&self, keys: Vec<K>) -> Result<BatchSummary, QueueError> {
        let guard = self.begin_batch()?;
        let summary = self
            .inner
            .runner
            .run_batch(guard.id.clone(), &keys, &guard.cancel)
            .await;
        Ok(summary)
    }

    /// Start a batch over `keys` in the background.
    ///
    /// The batch slot is taken before this returns, so a second call made
    /// right after fails with [`QueueError::BatchActive`].
    pub fn start_all(&self, keys: Vec<K>) -> Result<JoinHandle<BatchSummary>, QueueError> {
        let guard = self.begin_batch()?;
        let runner = Arc::clone(&self.inner.runner);
        Ok(tokio::spawn(async move {
            runner
                .run_batch(guard.id.clone(), &keys, &guard.cancel)
                .await
        }))
    }

    /// Stop the active batch after its in-flight call, if any.
    ///
    /// Returns `false` if no batch was running. The slot is released
    /// immediately so a new batch may start.
    pub fn cancel_all(&self) -> bool {
        match lock(&self.inner.active).take() {
            Some(batch) => {
                batch.cancel.cancel();
                info!(batch_id = %batch.id, "Batch cancellation requested");
                true
            }
            None => false,
        }
    }

    fn begin_batch(&self) -> Result<BatchGuard<K, E>, QueueError> {
        let mut active = lock(&self.inner.active);
        if active.is_some() {
            return Err(QueueError::BatchActive);
        }
        let id = uuid::Uuid::new_v4().to_string();
        let cancel = Arc::new(CancelSignal::new());
        *active = Some(ActiveBatch {
            id: id.clone(),
            cancel: Arc::clone(&cancel),
        });
        Ok(BatchGuard {
            inner: Arc::clone(&self.inner),
            id,
            cancel,
        })
    }
}

/// Releases the batch slot when the run ends, unless a newer run owns it.
struct BatchGuard<K, E> {
    inner: Arc<Inner<K, E>>,
    id: String,
    cancel: Arc<CancelSignal>,
}

impl<K, E> Drop for BatchGuard<K, E> {
    fn drop(&mut self) {
        let mut active = lock(&self.inner.active);
        if active.as_ref().is_some_and(|batch| batch.id == self.id) {
            *active = None;
        }
    }
}
