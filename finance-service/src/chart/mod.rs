//! The academic-year financial chart engine.
//!
//! One synchronous pipeline per request: resolve the year, resolve the
//! caller's scope, fetch the visible fee records once, then bucket,
//! classify, and aggregate entirely in memory. Every failure mode short of
//! a missing caller identity degrades to the canonical all-zero report so
//! the dashboard always has something to render.

pub mod academic_year;
pub mod bucket;
pub mod calendar;
pub mod classify;
pub mod report;
pub mod scope;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

pub use academic_year::AcademicYear;
pub use report::{empty_report, MonthBucket};
pub use scope::{ScopePredicate, ScopeRequest, ScopeResolution};

use crate::services::{FeeRecordStore, ParentDirectory};

/// Why a request degraded to the empty report. Logged for operators,
/// never surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidYearLabel { label: String },
    ParentHasNoChildren { parent_id: String },
    DirectoryUnavailable { parent_id: String, source: String },
    StoreUnavailable { source: String },
}

/// Chart pipeline result: always a full twelve-bucket report, plus the
/// diagnostic when the report is the degraded empty value.
#[derive(Debug)]
pub struct ChartOutcome {
    pub report: Vec<MonthBucket>,
    pub diagnostic: Option<Diagnostic>,
}

impl ChartOutcome {
    fn ready(report: Vec<MonthBucket>) -> Self {
        Self {
            report,
            diagnostic: None,
        }
    }

    fn degraded(diagnostic: Diagnostic) -> Self {
        Self {
            report: empty_report(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// One chart request, with the authenticated identity and the optional
/// overrides taken from query parameters.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub caller_id: String,
    pub caller_role: Option<String>,
    pub academic_year: Option<String>,
    pub requested_role: Option<String>,
    pub requested_user_id: Option<String>,
}

/// The engine, wired to its two collaborators.
#[derive(Clone)]
pub struct FinanceEngine {
    store: Arc<dyn FeeRecordStore>,
    parents: Arc<dyn ParentDirectory>,
}

impl FinanceEngine {
    pub fn new(store: Arc<dyn FeeRecordStore>, parents: Arc<dyn ParentDirectory>) -> Self {
        Self { store, parents }
    }

    /// Produce the monthly chart for one request. `today` is explicit so
    /// the pipeline stays deterministic under test.
    pub async fn monthly_chart(&self, request: &ChartRequest, today: NaiveDate) -> ChartOutcome {
        let year = match AcademicYear::resolve(request.academic_year.as_deref(), today) {
            Some(year) => year,
            None => {
                return ChartOutcome::degraded(Diagnostic::InvalidYearLabel {
                    label: request.academic_year.clone().unwrap_or_default(),
                });
            }
        };

        let scope_request = ScopeRequest {
            caller_id: request.caller_id.clone(),
            caller_role: request.caller_role.clone(),
            requested_role: request.requested_role.clone(),
            requested_user_id: request.requested_user_id.clone(),
        };
        let predicate = match scope::resolve_scope(self.parents.as_ref(), &scope_request).await {
            ScopeResolution::Scoped(predicate) => predicate,
            ScopeResolution::NoData(diagnostic) => return ChartOutcome::degraded(diagnostic),
        };

        let fees = match self.store.fees_for_year(&year.label, &predicate).await {
            Ok(fees) => fees,
            Err(err) => {
                warn!(error = %err, academic_year = %year.label, "Fee store unavailable, degrading to empty chart");
                return ChartOutcome::degraded(Diagnostic::StoreUnavailable {
                    source: err.to_string(),
                });
            }
        };

        debug!(
            academic_year = %year.label,
            fee_count = fees.len(),
            "Aggregating fees into monthly chart"
        );

        let report = report::aggregate(&fees, &year, today);

        let (collected, pending, overdue, total) = report::report_totals(&report);
        debug!(
            academic_year = %year.label,
            collected, pending, overdue, total,
            "Chart totals"
        );

        ChartOutcome::ready(report)
    }
}
