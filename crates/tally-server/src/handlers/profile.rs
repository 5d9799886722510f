//! Profile handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Extension, Json,
};

use crate::{json_body, AppError, AppState};
use tally_core::identity::Identity;
use tally_core::models::{Profile, ProfileUpdate};

/// GET /api/profile - The caller's profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Profile>, AppError> {
    let profile = state.db.get_profile(identity.user_id)?;

    state
        .db
        .record_audit(&identity.email, "get", Some("profile"), None, None);

    Ok(Json(profile))
}

/// PUT /api/profile - Update name and email
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<Profile>, AppError> {
    let update: ProfileUpdate = json_body(request).await?;

    let profile = state.db.update_profile(identity.user_id, &update)?;

    state.db.record_audit(
        &identity.email,
        "update",
        Some("profile"),
        None,
        Some(&format!("name={}, email={}", profile.name, profile.email)),
    );

    Ok(Json(profile))
}
