//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{json_body, parse_date_param, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::identity::Identity;
use tally_core::models::{ExpenseFilter, ExpenseWithCategory, NewExpense};

/// Query parameters for listing expenses
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    /// Matches notes or category name, case-insensitively
    pub search: Option<String>,
    pub category_id: Option<i64>,
    /// Start date (YYYY-MM-DD, inclusive)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/expenses - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<ExpenseWithCategory>>, AppError> {
    let from = parse_date_param(params.from.as_deref(), "from")?;
    let to = parse_date_param(params.to.as_deref(), "to")?;

    // `until` is exclusive, so the day after `to`
    let until = to
        .map(|d| {
            d.succ_opt()
                .ok_or_else(|| AppError::bad_request("Invalid 'to' date: out of range"))
        })
        .transpose()?;

    let filter = ExpenseFilter {
        from,
        until,
        category_id: params.category_id,
        search: params.search.clone(),
        limit: params.limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT)),
    };

    let expenses = state.db.list_expenses(identity.user_id, &filter)?;

    state.db.record_audit(
        &identity.email,
        "list",
        Some("expense"),
        None,
        Some(&format!(
            "count={}, search={:?}, category_id={:?}",
            expenses.len(),
            params.search,
            params.category_id
        )),
    );

    Ok(Json(expenses))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<ExpenseWithCategory>, AppError> {
    let req: NewExpense = json_body(request).await?;

    let expense = state.db.insert_expense(identity.user_id, &req)?;

    state.db.record_audit(
        &identity.email,
        "create",
        Some("expense"),
        Some(expense.expense.id),
        Some(&format!(
            "amount={}, date={}",
            expense.expense.amount, expense.expense.date
        )),
    );

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_expense(identity.user_id, id)? {
        return Err(AppError::not_found(&format!("Expense {} not found", id)));
    }

    state
        .db
        .record_audit(&identity.email, "delete", Some("expense"), Some(id), None);

    Ok(Json(SuccessResponse { success: true }))
}
