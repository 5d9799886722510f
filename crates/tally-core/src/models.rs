//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::money::Money;

/// Label used for expenses whose category is missing
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Display color for categories without one (and for "Uncategorized")
pub const DEFAULT_COLOR: &str = "#6B7280";

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Editable profile, one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Profile fields a user can change
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("Name cannot be empty".to_string()));
        }
        if !self.email.contains('@') {
            return Err(Error::InvalidData(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::BankTransfer => "bank_transfer",
            Self::DigitalWallet => "digital_wallet",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "cash" => Ok(Self::Cash),
            "credit_card" | "credit" => Ok(Self::CreditCard),
            "debit_card" | "debit" => Ok(Self::DebitCard),
            "bank_transfer" | "transfer" => Ok(Self::BankTransfer),
            "digital_wallet" | "wallet" => Ok(Self::DigitalWallet),
            "other" => Ok(Self::Other),
            _ => Err(format!(
                "Unknown payment method: {} (valid: cash, credit_card, debit_card, bank_transfer, digital_wallet, other)",
                s
            )),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-defined spending bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A category to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData(
                "Category name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn color_or_default(&self) -> &str {
        self.color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// A recorded spend event
///
/// Expenses are immutable once created; the only mutation is deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: UserId,
    pub category_id: Option<i64>,
    pub amount: Money,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An expense to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    #[serde(default)]
    pub category_id: Option<i64>,
    pub amount: Money,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_negative() {
            return Err(Error::InvalidData(format!(
                "Amount must not be negative: {}",
                self.amount
            )));
        }
        if self.amount > Money::MAX_AMOUNT {
            return Err(Error::InvalidData(format!(
                "Amount must not exceed {}: {}",
                Money::MAX_AMOUNT,
                self.amount
            )));
        }
        Ok(())
    }

    /// Notes with surrounding whitespace removed; blank notes become `None`
    pub fn normalized_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

/// An expense joined with its category's display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseWithCategory {
    #[serde(flatten)]
    pub expense: Expense,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

impl ExpenseWithCategory {
    /// Category name, falling back to "Uncategorized"
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    pub fn color_label(&self) -> &str {
        self.category_color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Whether notes or category name contain `term`, which must already be lowercase
    pub fn matches_search(&self, term: &str) -> bool {
        let contains = |field: Option<&str>| {
            field
                .map(|f| f.to_lowercase().contains(term))
                .unwrap_or(false)
        };
        contains(self.expense.notes.as_deref()) || contains(self.category_name.as_deref())
    }
}

/// Filters for listing expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Start date (inclusive)
    pub from: Option<NaiveDate>,
    /// End date (exclusive)
    pub until: Option<NaiveDate>,
    pub category_id: Option<i64>,
    /// Case-insensitive match against notes or category name
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// A per-category, per-month spending limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: UserId,
    pub category_id: i64,
    /// Always the first day of the month
    pub month: NaiveDate,
    pub limit_amount: Money,
}

/// A budget joined with its category's display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetWithCategory {
    #[serde(flatten)]
    pub budget: Budget,
    pub category_name: String,
    pub category_color: String,
}
