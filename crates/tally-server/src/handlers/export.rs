//! Export handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Extension,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::{attachment, AppError, AppState};
use tally_core::export::{export_filename, ExportFormat};
use tally_core::identity::Identity;

/// Query parameters for expense export
#[derive(Debug, Deserialize)]
pub struct ExpenseExportQuery {
    /// Output format: csv (default) or json
    pub format: Option<String>,
}

/// GET /api/export/expenses - Download all expenses as CSV or JSON
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ExpenseExportQuery>,
) -> Result<Response, AppError> {
    let format = match params.format.as_deref() {
        Some(f) => f.parse::<ExportFormat>()?,
        None => ExportFormat::Csv,
    };

    let export = state.db.export_expenses(identity.user_id, format)?;
    let filename = export_filename(Local::now().date_naive(), format);

    state.db.record_audit(
        &identity.email,
        "export",
        Some("expense"),
        None,
        Some(&format!("format={}, count={}", format.extension(), export.count)),
    );

    info!(user = %identity.email, count = export.count, "Exported expenses");

    attachment(format.content_type(), &filename, export.body)
}
