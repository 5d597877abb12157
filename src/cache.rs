//! In-memory collection cache with explicit invalidation.
//!
//! DESIGN
//! ======
//! Caches list payloads keyed by collection name. Workflow writes return the
//! collection keys they affect; route handlers invalidate those keys and the
//! next read re-fetches from the backend. Entries are never patched in place,
//! so there is no fine-grained consistency logic to maintain.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// Static name of a cached collection, e.g. `"cabins"`.
pub type CollectionKey = &'static str;

#[derive(Clone)]
pub struct CollectionCache {
    inner: Arc<RwLock<HashMap<CollectionKey, Value>>>,
}

impl CollectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn get(&self, key: CollectionKey) -> Option<Value> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: CollectionKey, value: Value) {
        self.inner.write().await.insert(key, value);
    }

    /// Drop a cached collection. A miss is a no-op.
    pub async fn invalidate(&self, key: CollectionKey) {
        if self.inner.write().await.remove(key).is_some() {
            tracing::debug!(collection = key, "cache invalidated");
        }
    }
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
