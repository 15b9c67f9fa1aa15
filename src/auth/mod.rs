//! Bearer token authentication.
//!
//! Every failure (missing header, malformed header, unknown session, wrong secret,
//! expired session) produces the same 401 response.

mod credentials;

pub use credentials::*;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::TokenResponse;
use crate::AppState;

/// The authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Resolve a bearer token to its user.
pub async fn authenticate(
    repo: &Repository,
    token: &str,
    now: DateTime<Utc>,
) -> Result<AuthUser, AppError> {
    let Some((session_id, secret)) = parse_token(token) else {
        tracing::warn!("Rejected malformed bearer token");
        return Err(AppError::unauthorized());
    };

    let Some(session) = repo.get_session(session_id).await? else {
        tracing::warn!("Rejected token for unknown session");
        return Err(AppError::unauthorized());
    };

    if !secret_matches(secret, &session.secret_hash) {
        tracing::warn!(session_id = %session.id, "Rejected token with wrong secret");
        return Err(AppError::unauthorized());
    }

    let expired = DateTime::parse_from_rfc3339(&session.expires_at)
        .map(|at| at.with_timezone(&Utc) <= now)
        .unwrap_or(true);
    if expired {
        tracing::warn!(session_id = %session.id, "Rejected expired token");
        return Err(AppError::unauthorized());
    }

    Ok(AuthUser {
        user_id: session.user_id,
    })
}

/// Create a session for `user_id` and return its bearer token.
///
/// The user's expired sessions are removed first.
pub async fn issue_token(
    repo: &Repository,
    user_id: &str,
    ttl: Duration,
) -> Result<TokenResponse, AppError> {
    let now = Utc::now();
    let pruned = repo.delete_expired_sessions_for_user(user_id, now).await?;
    if pruned > 0 {
        tracing::debug!(user_id, pruned, "Removed expired sessions");
    }

    let secret = generate_secret();
    let expires_at = now + ttl;
    let session = repo
        .create_session(user_id, &hash_secret(&secret), expires_at)
        .await?;

    Ok(TokenResponse {
        token: format_token(&session.id, &secret),
        expires_at: session.expires_at,
    })
}

/// Middleware guarding the sheet routes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return AppError::unauthorized().into_response();
    };

    match authenticate(&state.repo, token, Utc::now()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
