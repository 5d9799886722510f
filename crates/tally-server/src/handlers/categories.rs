//! Category management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Extension, Json,
};

use crate::{json_body, AppError, AppState, SuccessResponse};
use tally_core::identity::Identity;
use tally_core::models::{Category, NewCategory};

/// GET /api/categories - List the caller's categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories(identity.user_id)?;

    state.db.record_audit(
        &identity.email,
        "list",
        Some("category"),
        None,
        Some(&format!("count={}", categories.len())),
    );

    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let req: NewCategory = json_body(request).await?;

    let category = state.db.create_category(identity.user_id, &req)?;

    state.db.record_audit(
        &identity.email,
        "create",
        Some("category"),
        Some(category.id),
        Some(&format!("name={}", category.name)),
    );

    Ok(Json(category))
}

/// DELETE /api/categories/:id - Delete a category
///
/// Its expenses become uncategorized; its budgets are removed.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_category(identity.user_id, id)? {
        return Err(AppError::not_found(&format!("Category {} not found", id)));
    }

    state
        .db
        .record_audit(&identity.email, "delete", Some("category"), Some(id), None);

    Ok(Json(SuccessResponse { success: true }))
}
