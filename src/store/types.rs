//! Hosted-backend contracts — trait seams and shared wire types.
//!
//! DESIGN
//! ======
//! The workflow layer never talks HTTP directly. It sees three narrow traits
//! that mirror the hosted backend's contracts: a table store (row CRUD by
//! table name and id), a file store (bucket upload + deterministic public
//! URL), and the auth API (password sign-in, token lookup). Tests substitute
//! recording mocks; production uses the single `HostedClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by hosted-backend calls.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("backend response error: status {status}")]
    Response { status: u16, body: String },

    /// The backend response body could not be deserialized.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// TABLE STORE
// =============================================================================

/// Row CRUD against the hosted table API.
///
/// Rows travel as JSON values; each domain service owns its own typed
/// (de)serialization so this seam stays table-agnostic.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch all rows of a table.
    async fn select_all(&self, table: &str) -> Result<Vec<Value>, StoreError>;

    /// Insert one row and return the inserted row as stored.
    async fn insert_returning(&self, table: &str, row: Value) -> Result<Value, StoreError>;

    /// Apply changes to the row matching `id` and return the updated row.
    async fn update_returning(&self, table: &str, id: i64, changes: Value) -> Result<Value, StoreError>;

    /// Delete the row matching `id`.
    async fn delete_row(&self, table: &str, id: i64) -> Result<(), StoreError>;
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Object upload against the hosted storage API.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload a payload under `bucket/name`.
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<(), StoreError>;

    /// Deterministic public URL for an object, derived without any request.
    fn public_url(&self, bucket: &str, name: &str) -> String;
}

// =============================================================================
// AUTH API
// =============================================================================

/// Token grant returned by the hosted auth password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// The staff user behind a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedInUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Hosted auth endpoints consumed by the sign-in passthrough.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email + password for a token grant.
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenGrant, StoreError>;

    /// Resolve the user behind an access token.
    async fn user_for_token(&self, token: &str) -> Result<SignedInUser, StoreError>;
}
