//! Bucket aggregation and the canonical report shape.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::chart::academic_year::AcademicYear;
use crate::chart::bucket::{normalize_dates, ACADEMIC_MONTHS};
use crate::chart::classify::{classify, Contribution};
use crate::models::FeeRecord;

/// One month of the chart as returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthBucket {
    pub name: &'static str,
    pub collected: i64,
    pub pending: i64,
    pub overdue: i64,
    pub total: i64,
}

/// Round to whole currency units, half away from zero.
fn round_whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Build the twelve-bucket report for one academic year.
///
/// Each column is rounded after summation; `total` rounds the exact sum of
/// the three columns rather than adding the already-rounded parts.
pub fn aggregate(records: &[FeeRecord], year: &AcademicYear, today: NaiveDate) -> Vec<MonthBucket> {
    let dated = normalize_dates(records);

    ACADEMIC_MONTHS
        .iter()
        .map(|slot| {
            let calendar_year = slot.calendar_year(year);
            let mut sums = Contribution::default();
            for fee in dated.iter().filter(|f| f.in_month(calendar_year, slot.month)) {
                sums.add(classify(fee, today));
            }
            MonthBucket {
                name: slot.name,
                collected: round_whole(sums.collected),
                pending: round_whole(sums.pending),
                overdue: round_whole(sums.overdue),
                total: round_whole(sums.collected + sums.pending + sums.overdue),
            }
        })
        .collect()
}

/// The uniform degradation value: twelve buckets in standard order, all
/// zeros. Returned whenever the pipeline cannot produce real figures.
pub fn empty_report() -> Vec<MonthBucket> {
    ACADEMIC_MONTHS
        .iter()
        .map(|slot| MonthBucket {
            name: slot.name,
            collected: 0,
            pending: 0,
            overdue: 0,
            total: 0,
        })
        .collect()
}

/// Grand totals across all buckets, for operator logs.
pub fn report_totals(report: &[MonthBucket]) -> (i64, i64, i64, i64) {
    report.iter().fold((0, 0, 0, 0), |acc, bucket| {
        (
            acc.0 + bucket.collected,
            acc.1 + bucket.pending,
            acc.2 + bucket.overdue,
            acc.3 + bucket.total,
        )
    })
}
