//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the storage adapter behind its three trait seams, the collection
//! cache, and the image bucket name. In production all three trait objects
//! are the same `HostedClient`; tests swap in a recording mock.

use std::sync::Arc;

use crate::cache::CollectionCache;
use crate::config::AppConfig;
use crate::store::{AuthApi, FileStore, HostedClient, TableStore};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<dyn TableStore>,
    pub files: Arc<dyn FileStore>,
    pub auth: Arc<dyn AuthApi>,
    pub cache: CollectionCache,
    /// Storage bucket holding cabin images.
    pub image_bucket: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(
        tables: Arc<dyn TableStore>,
        files: Arc<dyn FileStore>,
        auth: Arc<dyn AuthApi>,
        image_bucket: &str,
    ) -> Self {
        Self { tables, files, auth, cache: CollectionCache::new(), image_bucket: Arc::from(image_bucket) }
    }

    /// Production wiring: one hosted client behind every seam.
    #[must_use]
    pub fn from_client(client: HostedClient, config: &AppConfig) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client, &config.image_bucket)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
