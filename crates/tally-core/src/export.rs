//! Expense export
//!
//! Supports:
//! - CSV with one row per expense (`Date,Category,Amount,Payment Method,Notes`)
//! - JSON with the full expense records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ExpenseWithCategory;

pub const CSV_HEADER: [&str; 5] = ["Date", "Category", "Amount", "Payment Method", "Notes"];

/// Export format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidData(format!(
                "Unknown export format: {} (valid: csv, json)",
                other
            ))),
        }
    }
}

/// Default download name, e.g. `expenses-2026-10-16.csv`
pub fn export_filename(today: NaiveDate, format: ExportFormat) -> String {
    format!("expenses-{}.{}", today.format("%Y-%m-%d"), format.extension())
}

/// Render expenses as CSV in the order given
///
/// Fields containing a comma, quote or newline are quoted with embedded quotes
/// doubled. No expenses yields just the header row.
pub fn expenses_to_csv(expenses: &[ExpenseWithCategory]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for exp in expenses {
        let e = &exp.expense;
        writer.write_record([
            e.date.format("%Y-%m-%d").to_string(),
            exp.category_label().to_string(),
            e.amount.to_string(),
            e.payment_method.as_str().to_string(),
            e.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("Invalid UTF-8 in CSV: {}", e)))
}

/// Render expenses as pretty-printed JSON
pub fn expenses_to_json(expenses: &[ExpenseWithCategory]) -> Result<String> {
    Ok(serde_json::to_string_pretty(expenses)?)
}

/// Rendered export, ready to be written to a file or sent as a download
#[derive(Debug, Clone)]
pub struct ExpenseExport {
    pub format: ExportFormat,
    pub count: usize,
    pub body: String,
}

impl ExpenseExport {
    pub fn render(format: ExportFormat, expenses: &[ExpenseWithCategory]) -> Result<Self> {
        let body = match format {
            ExportFormat::Csv => expenses_to_csv(expenses)?,
            ExportFormat::Json => expenses_to_json(expenses)?,
        };
        Ok(Self {
            format,
            count: expenses.len(),
            body,
        })
    }
}
