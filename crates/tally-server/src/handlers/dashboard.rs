//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{as_of_or_today, AppError, AppState};
use tally_core::identity::Identity;
use tally_core::reports::DashboardStats;

/// Query parameters for date-relative reports
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// Reference date (YYYY-MM-DD, default: today)
    pub as_of: Option<String>,
}

/// GET /api/dashboard - Totals, this month, and daily average
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let today = as_of_or_today(params.as_of.as_deref())?;

    let stats = state.db.dashboard(identity.user_id, today)?;

    state.db.record_audit(
        &identity.email,
        "report",
        Some("dashboard"),
        None,
        Some(&format!("as_of={}", today)),
    );

    Ok(Json(stats))
}
