//! Staff sign-in passthrough to the hosted auth backend.
//!
//! No credentials are stored or verified here; the hosted backend owns the
//! user table and password checks. This module only translates its responses
//! into the two cases the routes care about: bad credentials/token versus an
//! unreachable auth service.

use crate::store::{AuthApi, SignedInUser, StoreError, TokenGrant};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("authentication service unavailable")]
    Unavailable,
}

/// Exchange staff credentials for a token grant.
///
/// # Errors
///
/// `InvalidCredentials` when the backend rejects the login; `Unavailable`
/// for transport failures or unexpected responses.
pub async fn sign_in(auth: &dyn AuthApi, email: &str, password: &str) -> Result<TokenGrant, AuthError> {
    match auth.sign_in(email, password).await {
        Ok(grant) => Ok(grant),
        Err(StoreError::Response { status: 400 | 401 | 403, .. }) => Err(AuthError::InvalidCredentials),
        Err(e) => {
            tracing::error!(error = %e, "sign-in request failed");
            Err(AuthError::Unavailable)
        }
    }
}

/// Resolve the staff user behind a bearer token.
///
/// # Errors
///
/// `InvalidToken` when the backend rejects the token; `Unavailable` for
/// transport failures or unexpected responses.
pub async fn current_user(auth: &dyn AuthApi, token: &str) -> Result<SignedInUser, AuthError> {
    match auth.user_for_token(token).await {
        Ok(user) => Ok(user),
        Err(StoreError::Response { status: 401 | 403, .. }) => Err(AuthError::InvalidToken),
        Err(e) => {
            tracing::error!(error = %e, "token lookup failed");
            Err(AuthError::Unavailable)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
