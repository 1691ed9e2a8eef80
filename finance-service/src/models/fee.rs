//! Fee record model for finance-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fee status as recorded by the admissions workflow.
///
/// Partial payments are not a distinct status; they are inferable from
/// `paid_amount` on a record still flagged `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Paid,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Pending => "pending",
            FeeStatus::Paid => "paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => FeeStatus::Paid,
            _ => FeeStatus::Pending,
        }
    }
}

/// One billable obligation against a student.
///
/// Due and paid dates are kept as the raw text the upstream system wrote
/// (the fee tables were imported from the legacy application, which stored
/// dates as strings). They are normalized once, during bucketing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeeRecord {
    pub fee_id: Uuid,
    /// Identity-provider id of the owning student (opaque string).
    pub student_id: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub status: String,
    pub due_date: Option<String>,
    pub paid_date: Option<String>,
    /// Academic-year label assigned at creation time, e.g. "2024-2025".
    pub academic_year: String,
}

impl FeeRecord {
    pub fn status(&self) -> FeeStatus {
        FeeStatus::from_string(&self.status)
    }
}
