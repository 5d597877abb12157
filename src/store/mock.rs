//! Recording mock backend for workflow and route tests.
//!
//! Records every backend call in order and keeps an in-memory row set so
//! tests can assert both the call sequence and the net persisted state.
//! Failure toggles are atomics so a test can flip them between attempts.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::types::{AuthApi, FileStore, SignedInUser, StoreError, TableStore, TokenGrant};

pub const MOCK_BASE_URL: &str = "https://backend.test";
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const MOCK_USER_ID: &str = "mock-user-id";

#[derive(Debug, Clone)]
pub enum BackendCall {
    Select { table: String },
    Insert { table: String, row: Value },
    Update { table: String, id: i64, changes: Value },
    Delete { table: String, id: i64 },
    Upload { bucket: String, name: String, content_type: String },
    SignIn { email: String },
    UserLookup { token: String },
}

#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<BackendCall>>,
    rows: Mutex<Vec<Value>>,
    next_id: AtomicI64,
    pub fail_select: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_upload: AtomicBool,
    pub deny_sign_in: AtomicBool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { next_id: AtomicI64::new(1), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    pub fn rows(&self) -> Vec<Value> {
        self.rows.lock().expect("mock lock poisoned").clone()
    }

    pub fn seed_rows(&self, rows: Vec<Value>) {
        *self.rows.lock().expect("mock lock poisoned") = rows;
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().expect("mock lock poisoned").push(call);
    }

    fn failure() -> StoreError {
        StoreError::Response { status: 500, body: "mock backend failure".into() }
    }
}

#[async_trait]
impl TableStore for MockBackend {
    async fn select_all(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        self.record(BackendCall::Select { table: table.to_owned() });
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self.rows())
    }

    async fn insert_returning(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        self.record(BackendCall::Insert { table: table.to_owned(), row: row.clone() });
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = row;
        if let Some(map) = stored.as_object_mut() {
            map.insert("id".into(), Value::from(id));
        }
        self.rows.lock().expect("mock lock poisoned").push(stored.clone());
        Ok(stored)
    }

    async fn update_returning(&self, table: &str, id: i64, changes: Value) -> Result<Value, StoreError> {
        self.record(BackendCall::Update { table: table.to_owned(), id, changes: changes.clone() });
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }

        let mut updated = changes;
        if let Some(map) = updated.as_object_mut() {
            map.insert("id".into(), Value::from(id));
        }
        Ok(updated)
    }

    async fn delete_row(&self, table: &str, id: i64) -> Result<(), StoreError> {
        self.record(BackendCall::Delete { table: table.to_owned(), id });
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        self.rows
            .lock()
            .expect("mock lock poisoned")
            .retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
        Ok(())
    }
}

#[async_trait]
impl FileStore for MockBackend {
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        _payload: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.record(BackendCall::Upload {
            bucket: bucket.to_owned(),
            name: name.to_owned(),
            content_type: content_type.to_owned(),
        });
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        super::http::object_public_url(MOCK_BASE_URL, bucket, name)
    }
}

#[async_trait]
impl AuthApi for MockBackend {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<TokenGrant, StoreError> {
        self.record(BackendCall::SignIn { email: email.to_owned() });
        if self.deny_sign_in.load(Ordering::SeqCst) {
            return Err(StoreError::Response { status: 400, body: "invalid login credentials".into() });
        }
        Ok(TokenGrant {
            access_token: MOCK_ACCESS_TOKEN.to_owned(),
            token_type: "bearer".to_owned(),
            expires_in: Some(3600),
            refresh_token: None,
        })
    }

    async fn user_for_token(&self, token: &str) -> Result<SignedInUser, StoreError> {
        self.record(BackendCall::UserLookup { token: token.to_owned() });
        if token == MOCK_ACCESS_TOKEN {
            Ok(SignedInUser { id: MOCK_USER_ID.to_owned(), email: Some("staff@hotel.test".to_owned()) })
        } else {
            Err(StoreError::Response { status: 401, body: "invalid token".into() })
        }
    }
}
