//! Month bucketing across an academic year.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::chart::academic_year::AcademicYear;
use crate::chart::calendar;
use crate::models::FeeRecord;

/// The twelve reporting slots in fixed academic order.
pub const ACADEMIC_MONTHS: [AcademicMonth; 12] = [
    AcademicMonth { name: "Jul", month: 7 },
    AcademicMonth { name: "Aug", month: 8 },
    AcademicMonth { name: "Sep", month: 9 },
    AcademicMonth { name: "Oct", month: 10 },
    AcademicMonth { name: "Nov", month: 11 },
    AcademicMonth { name: "Dec", month: 12 },
    AcademicMonth { name: "Jan", month: 1 },
    AcademicMonth { name: "Feb", month: 2 },
    AcademicMonth { name: "Mar", month: 3 },
    AcademicMonth { name: "Apr", month: 4 },
    AcademicMonth { name: "May", month: 5 },
    AcademicMonth { name: "Jun", month: 6 },
];

#[derive(Debug, Clone, Copy)]
pub struct AcademicMonth {
    pub name: &'static str,
    /// Calendar month, 1-based.
    pub month: u32,
}

impl AcademicMonth {
    /// Calendar year this slot carries within the given academic year:
    /// July-December belong to the start year, January-June to the end year.
    pub fn calendar_year(&self, year: &AcademicYear) -> i32 {
        if self.month >= 7 {
            year.start_year
        } else {
            year.end_year
        }
    }
}

/// A fee record with its dates normalized for bucketing.
#[derive(Debug)]
pub struct DatedFee<'a> {
    pub fee: &'a FeeRecord,
    pub due: NaiveDate,
    pub paid: Option<NaiveDate>,
}

impl DatedFee<'_> {
    /// A record belongs to a slot if it became due there OR was paid there,
    /// so a record due in one month and paid in another contributes to both.
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        let due_here = self.due.year() == year && self.due.month() == month;
        let paid_here = self
            .paid
            .is_some_and(|paid| paid.year() == year && paid.month() == month);
        due_here || paid_here
    }
}

/// Normalize records for bucketing, excluding those with a missing or
/// unparseable due date or an unparseable paid date. Exclusions are a
/// data-quality signal, never a request error.
pub fn normalize_dates(records: &[FeeRecord]) -> Vec<DatedFee<'_>> {
    records
        .iter()
        .filter_map(|fee| {
            let due = match fee.due_date.as_deref() {
                Some(raw) => match calendar::parse_day(raw) {
                    Some(date) => date,
                    None => {
                        warn!(fee_id = %fee.fee_id, due_date = raw, "Unparseable due date, excluding fee from chart");
                        return None;
                    }
                },
                None => {
                    warn!(fee_id = %fee.fee_id, "Fee has no due date, excluding from chart");
                    return None;
                }
            };
            let paid = match fee.paid_date.as_deref() {
                Some(raw) => match calendar::parse_day(raw) {
                    Some(date) => Some(date),
                    None => {
                        warn!(fee_id = %fee.fee_id, paid_date = raw, "Unparseable paid date, excluding fee from chart");
                        return None;
                    }
                },
                None => None,
            };
            Some(DatedFee { fee, due, paid })
        })
        .collect()
}
