//! Sheet API endpoints. Every route here runs behind [`crate::auth::require_auth`].

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{SeedDocument, SheetDocument};
use crate::sheet::{normalize, validate_document};
use crate::AppState;

/// GET /api/sheet - The caller's sheet, or an empty one if none was ever written.
pub async fn get_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SheetDocument>, AppError> {
    let sheet = state.repo.get_sheet(&user.user_id).await?;
    Ok(Json(sheet.unwrap_or_default()))
}

/// PUT /api/sheet - Replace the caller's whole topic list.
pub async fn put_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SheetDocument>,
) -> Result<Json<SheetDocument>, AppError> {
    store(&state, &user, &request).await
}

/// POST /api/sheet/import - Normalize a flat seed document and store it as the sheet.
pub async fn import_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(seed): Json<SeedDocument>,
) -> Result<Json<SheetDocument>, AppError> {
    let document = normalize(seed.into_records()).to_document();
    store(&state, &user, &document).await
}

/// POST /api/sheet/seed - Reset the caller's sheet to the startup seed.
pub async fn reset_to_seed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SheetDocument>, AppError> {
    let Some(seed) = state.seed.clone() else {
        return Err(AppError::NotFound("No seed sheet configured".to_string()));
    };
    store(&state, &user, &seed).await
}

async fn store(
    state: &AppState,
    user: &AuthUser,
    document: &SheetDocument,
) -> Result<Json<SheetDocument>, AppError> {
    validate_document(document)?;

    let stored = state
        .repo
        .upsert_sheet(&user.user_id, &document.topics)
        .await?;
    tracing::debug!(
        user_id = %user.user_id,
        topics = stored.topics.len(),
        revision = ?stored.revision,
        "Stored sheet"
    );
    Ok(Json(stored))
}
