use serde::Serialize;

use crate::types::TaskState;

/// Emitted by the store on every write, including writes that leave the
/// state unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange<K> {
    pub key: K,
    pub previous: TaskState,
    pub state: TaskState,
}

impl<K> StateChange<K> {
    /// Whether this write moved the key into a terminal state.
    pub fn is_completion(&self) -> bool {
        self.previous.is_pending() && self.state.is_terminal()
    }
}
