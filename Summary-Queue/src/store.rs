use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::events::StateChange;
use crate::types::{ClaimPolicy, TaskState};

type Listener<K> = Arc<dyn Fn(&StateChange<K>) + Send + Sync>;

struct Listeners<K> {
    next_id: u64,
    entries: Vec<(u64, Listener<K>)>,
}

/// Keyed map of task states with change notification.
///
/// Listeners run synchronously on the writing thread after the lock is
/// released, so they may read or write the store themselves. Every write is
/// delivered, unchanged or not.
pub struct TaskStore<K> {
    states: Mutex<HashMap<K, TaskState>>,
    listeners: Arc<Mutex<Listeners<K>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> Default for TaskStore<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TaskStore<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Current state of `key`. Never-touched keys are `Idle`.
    pub fn get(&self, key: &K) -> TaskState {
        lock(&self.states).get(key).cloned().unwrap_or_default()
    }

    pub fn set(&self, key: K, state: TaskState) {
        let previous = {
            let mut states = lock(&self.states);
            states.insert(key.clone(), state.clone()).unwrap_or_default()
        };
        self.notify(&StateChange {
            key,
            previous,
            state,
        });
    }

    /// Put `key` back to `Idle`.
    pub fn reset(&self, key: K) {
        self.set(key, TaskState::Idle);
    }

    /// Atomically move `key` to `Pending` if `policy` allows its current state.
    ///
    /// Returns `false` and leaves the store untouched otherwise.
    pub fn try_claim(&self, key: &K, policy: ClaimPolicy) -> bool {
        let previous = {
            let mut states = lock(&self.states);
            let current = states.get(key).cloned().unwrap_or_default();
            if !policy.allows(&current) {
                return false;
            }
            states.insert(key.clone(), TaskState::Pending);
            current
        };
        self.notify(&StateChange {
            key: key.clone(),
            previous,
            state: TaskState::Pending,
        });
        true
    }

    /// Register a listener for every write. Dropping the returned
    /// [`Subscription`] removes it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateChange<K>) + Send + Sync + 'static,
        K: Send + 'static,
    {
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        let weak: Weak<Mutex<Listeners<K>>> = Arc::downgrade(&self.listeners);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    lock(&listeners).entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Copy of every key that has been written at least once.
    pub fn snapshot(&self) -> HashMap<K, TaskState> {
        lock(&self.states).clone()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }

    fn notify(&self, change: &StateChange<K>) {
        let listeners: Vec<Listener<K>> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

/// Handle for a registered listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.remove_now();
    }

    /// Keep the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.remove = None;
    }

    fn remove_now(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
