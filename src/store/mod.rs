//! Storage client adapter for the hosted backend.
//!
//! ARCHITECTURE
//! ============
//! Trait seams (`TableStore`, `FileStore`, `AuthApi`) describe the hosted
//! backend's contracts; `HostedClient` is the one HTTP implementation of all
//! three. Domain services depend only on the traits, which keeps the cabin
//! workflow testable without a live backend.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http::HostedClient;
pub use types::{AuthApi, FileStore, SignedInUser, StoreError, TableStore, TokenGrant};
