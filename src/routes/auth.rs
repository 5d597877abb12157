//! Auth routes — staff sign-in passthrough and the bearer-token extractor.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::services::auth::{self as auth_svc, AuthError};
use crate::state::AppState;
use crate::store::{SignedInUser, TokenGrant};

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated staff user resolved from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SignedInUser,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let Some(token) = header.strip_prefix("Bearer ") else {
            return Err(StatusCode::UNAUTHORIZED);
        };

        let app_state = AppState::from_ref(state);
        let user = auth_svc::current_user(app_state.auth.as_ref(), token)
            .await
            .map_err(|e| match e {
                AuthError::InvalidToken | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Unavailable => StatusCode::BAD_GATEWAY,
            })?;

        Ok(Self { user })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — exchange credentials for a hosted-backend token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<TokenGrant>, StatusCode> {
    let grant = auth_svc::sign_in(state.auth.as_ref(), &body.email, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_GATEWAY,
        })?;

    tracing::info!(email = %body.email, "staff signed in");
    Ok(Json(grant))
}

/// `GET /api/auth/me` — the user behind the presented token.
pub async fn me(auth: AuthUser) -> Json<SignedInUser> {
    Json(auth.user)
}
