//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own workflow logic against the storage adapter traits so
//! route handlers can stay focused on form decoding, validation, and error
//! translation.

pub mod auth;
pub mod cabin;
