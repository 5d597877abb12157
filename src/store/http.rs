//! HTTP client for the hosted storage-and-auth backend.
//!
//! Thin wrapper over three REST surfaces: the table API under `/rest/v1`,
//! object storage under `/storage/v1`, and auth under `/auth/v1`. Pure
//! parsing helpers are split out for testability.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{AuthApi, FileStore, SignedInUser, StoreError, TableStore, TokenGrant};
use crate::config::AppConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HostedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedClient {
    /// Build the backend client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::ClientBuild(e.to_string()))?;

        Ok(Self { http, base_url: config.backend_url.clone(), api_key: config.api_key.clone() })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Attach the key headers every backend request needs.
    fn with_keys(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    /// Send a request and return the body text of a success response.
    async fn send_for_text(&self, request: reqwest::RequestBuilder) -> Result<String, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(StoreError::Response { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// TABLE API
// =============================================================================

#[async_trait]
impl TableStore for HostedClient {
    async fn select_all(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}?select=*", self.table_url(table));
        let text = self.send_for_text(self.with_keys(self.http.get(url))).await?;
        parse_rows(&text)
    }

    async fn insert_returning(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let request = self
            .with_keys(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row);
        let text = self.send_for_text(request).await?;
        first_row(parse_rows(&text)?)
    }

    async fn update_returning(&self, table: &str, id: i64, changes: Value) -> Result<Value, StoreError> {
        let url = format!("{}?id=eq.{id}", self.table_url(table));
        let request = self
            .with_keys(self.http.patch(url))
            .header("Prefer", "return=representation")
            .json(&changes);
        let text = self.send_for_text(request).await?;
        first_row(parse_rows(&text)?)
    }

    async fn delete_row(&self, table: &str, id: i64) -> Result<(), StoreError> {
        let url = format!("{}?id=eq.{id}", self.table_url(table));
        self.send_for_text(self.with_keys(self.http.delete(url))).await?;
        Ok(())
    }
}

// =============================================================================
// STORAGE API
// =============================================================================

#[async_trait]
impl FileStore for HostedClient {
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<(), StoreError> {
        let url = format!("{}/storage/v1/object/{bucket}/{name}", self.base_url);
        let request = self
            .with_keys(self.http.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload);
        self.send_for_text(request).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        object_public_url(&self.base_url, bucket, name)
    }
}

// =============================================================================
// AUTH API
// =============================================================================

#[async_trait]
impl AuthApi for HostedClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<TokenGrant, StoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });
        let text = self.send_for_text(self.with_keys(self.http.post(url)).json(&body)).await?;
        parse_token_grant(&text)
    }

    async fn user_for_token(&self, token: &str) -> Result<SignedInUser, StoreError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let request = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token);
        let text = self.send_for_text(request).await?;
        parse_signed_in_user(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Fixed public URL template for stored objects.
pub(crate) fn object_public_url(base_url: &str, bucket: &str, name: &str) -> String {
    format!("{base_url}/storage/v1/object/public/{bucket}/{name}")
}

fn parse_rows(json: &str) -> Result<Vec<Value>, StoreError> {
    serde_json::from_str::<Vec<Value>>(json).map_err(|e| StoreError::Parse(e.to_string()))
}

/// The table API returns an array even for single-row writes.
fn first_row(rows: Vec<Value>) -> Result<Value, StoreError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::Parse("expected one returned row, got none".into()))
}

fn parse_token_grant(json: &str) -> Result<TokenGrant, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))
}

fn parse_signed_in_user(json: &str) -> Result<SignedInUser, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
