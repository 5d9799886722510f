//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::dashboard::AsOfQuery;
use crate::{as_of_or_today, AppError, AppState};
use tally_core::identity::Identity;
use tally_core::reports::{CategoryReport, MonthlyTrend};

/// GET /api/reports/categories - Spending distribution across categories
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<CategoryReport>, AppError> {
    let report = state.db.category_report(identity.user_id)?;

    state.db.record_audit(
        &identity.email,
        "report",
        Some("categories"),
        None,
        Some(&format!("groups={}", report.categories.len())),
    );

    Ok(Json(report))
}

/// GET /api/reports/monthly - Six-month spending trend
pub async fn report_monthly(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<MonthlyTrend>, AppError> {
    let today = as_of_or_today(params.as_of.as_deref())?;

    let trend = state.db.monthly_trend(identity.user_id, today)?;

    state.db.record_audit(
        &identity.email,
        "report",
        Some("monthly"),
        None,
        Some(&format!("as_of={}", today)),
    );

    Ok(Json(trend))
}
