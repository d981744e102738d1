// src/core/store.rs — In-memory execution store
//
// Process-lifetime only: entries survive until restart, never longer.
// Keys are fresh UUIDs, so writes never contend on the same entry; the
// lock covers concurrent inserts from simultaneously running batches.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::types::ExecutionResult;

/// Shared, write-once-per-key map from execution id to result.
#[derive(Clone, Default)]
pub struct ExecutionStore {
    inner: Arc<RwLock<HashMap<String, ExecutionResult>>>,
}

impl ExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished execution. Keys are write-once: a duplicate id is
    /// dropped with a warning rather than overwriting the stored result.
    pub async fn insert(&self, result: ExecutionResult) {
        let mut map = self.inner.write().await;
        if map.contains_key(&result.execution_id) {
            tracing::warn!(
                "execution {} already stored, ignoring duplicate",
                result.execution_id
            );
            return;
        }
        map.insert(result.execution_id.clone(), result);
    }

    pub async fn get(&self, execution_id: &str) -> Option<ExecutionResult> {
        self.inner.read().await.get(execution_id).cloned()
    }

    pub async fn all(&self) -> Vec<ExecutionResult> {
        self.inner.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
