//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{as_of_or_today, json_body, parse_month, AppError, AppState, SuccessResponse};
use tally_core::identity::Identity;
use tally_core::models::Budget;
use tally_core::reports::BudgetReport;
use tally_core::Money;

/// Query parameters for the budget report
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Month as YYYY-MM (default: current month)
    pub month: Option<String>,
}

/// Request body for setting a budget
#[derive(Debug, Deserialize)]
pub struct UpsertBudgetRequest {
    pub category_id: i64,
    /// Month as YYYY-MM
    pub month: String,
    pub limit: Money,
}

/// GET /api/budgets - Budgets for a month with spending status
pub async fn get_budgets(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<BudgetQuery>,
) -> Result<Json<BudgetReport>, AppError> {
    let month = match params.month.as_deref() {
        Some(m) => parse_month(m)?,
        None => as_of_or_today(None)?,
    };

    let report = state.db.budget_report(identity.user_id, month)?;

    state.db.record_audit(
        &identity.email,
        "report",
        Some("budget"),
        None,
        Some(&format!(
            "month={}, count={}",
            report.month.format("%Y-%m"),
            report.budgets.len()
        )),
    );

    Ok(Json(report))
}

/// PUT /api/budgets - Create or replace the limit for a category and month
pub async fn upsert_budget(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let req: UpsertBudgetRequest = json_body(request).await?;
    let month = parse_month(&req.month)?;

    let budget = state
        .db
        .upsert_budget(identity.user_id, req.category_id, month, req.limit)?;

    state.db.record_audit(
        &identity.email,
        "upsert",
        Some("budget"),
        Some(budget.id),
        Some(&format!(
            "category_id={}, month={}, limit={}",
            budget.category_id,
            budget.month.format("%Y-%m"),
            budget.limit_amount
        )),
    );

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_budget(identity.user_id, id)? {
        return Err(AppError::not_found(&format!("Budget {} not found", id)));
    }

    state
        .db
        .record_audit(&identity.email, "delete", Some("budget"), Some(id), None);

    Ok(Json(SuccessResponse { success: true }))
}
