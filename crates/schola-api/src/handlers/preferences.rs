//! Owner preference endpoints.

use axum::extract::State;
use axum::Json;

use schola_core::{OwnerPreferences, PreferenceRepository, PreferenceSet};

use crate::auth::OwnerIdentity;
use crate::error::{to_response, ApiResult};
use crate::AppState;

/// GET /api/v1/preferences
///
/// Returns defaults on first use; no row is created until the first save.
#[utoipa::path(get, path = "/api/v1/preferences", tag = "Preferences",
    responses((status = 200, description = "Success", body = OwnerPreferences)))]
pub async fn get_preferences(
    State(state): State<AppState>,
    owner: OwnerIdentity,
) -> ApiResult<Json<OwnerPreferences>> {
    let prefs = state
        .db
        .preferences
        .load(owner.0)
        .await
        .map_err(to_response)?;
    Ok(Json(prefs))
}

/// PUT /api/v1/preferences
#[utoipa::path(put, path = "/api/v1/preferences", tag = "Preferences",
    request_body = PreferenceSet,
    responses((status = 200, description = "Saved", body = OwnerPreferences)))]
pub async fn put_preferences(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Json(prefs): Json<PreferenceSet>,
) -> ApiResult<Json<OwnerPreferences>> {
    let saved = state
        .db
        .preferences
        .save(owner.0, prefs)
        .await
        .map_err(to_response)?;
    Ok(Json(saved))
}
