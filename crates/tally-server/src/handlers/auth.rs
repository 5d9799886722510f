//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use crate::{bearer_token, AppError, AppState, SuccessResponse};
use tally_core::identity::{AuthMethod, Identity, Session};
use tally_core::models::Profile;

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
    /// How the user was authenticated
    pub auth_method: String,
    pub profile: Profile,
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<MeResponse>, AppError> {
    let profile = state.db.get_profile(identity.user_id)?;

    state
        .db
        .record_audit(&identity.email, "get", Some("me"), None, None);

    Ok(Json(MeResponse {
        user_id: identity.user_id.0,
        email: identity.email,
        auth_method: identity.method.as_str().to_string(),
        profile,
    }))
}

/// POST /api/auth/sign-out - Revoke the presented token
///
/// Local sessions have no token; signing out of one succeeds without
/// revoking anything.
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let mut session = Session::new();
    session.authenticate(identity)?;

    let revoked = match (session.require()?.method, bearer_token(request.headers())) {
        (AuthMethod::Token, Some(token)) => state.db.revoke_token(token)?,
        _ => false,
    };

    if let Some(identity) = session.sign_out() {
        state.db.record_audit(
            &identity.email,
            "sign_out",
            Some("session"),
            None,
            Some(&format!("revoked={}", revoked)),
        );
        info!(user = %identity.email, revoked, "Signed out");
    }

    Ok(Json(SuccessResponse { success: true }))
}
