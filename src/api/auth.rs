//! Account API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{hash_password, issue_token, verify_password};
use crate::errors::AppError;
use crate::models::{CredentialsRequest, TokenResponse};
use crate::AppState;

/// Message for both unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn require_credentials(request: &CredentialsRequest) -> Result<String, AppError> {
    let email = request.normalized_email();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Missing email or password".to_string(),
        ));
    }
    Ok(email)
}

/// Run a CPU-heavy closure on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
}

/// POST /api/auth/register - Create an account and return a token.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let email = require_credentials(&request)?;

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password = request.password;
    let password_hash = blocking(move || hash_password(&password)).await?;
    let user = state.repo.create_user(&email, &password_hash).await?;
    tracing::info!(user_id = %user.id, "Registered new user");

    let token = issue_token(&state.repo, &user.id, state.config.token_ttl).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /api/auth/login - Exchange credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = require_credentials(&request)?;

    let Some(user) = state.repo.find_user_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let valid = blocking(move || verify_password(&password, &stored_hash)).await?;
    if !valid {
        tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    let token = issue_token(&state.repo, &user.id, state.config.token_ttl).await?;
    Ok(Json(token))
}
