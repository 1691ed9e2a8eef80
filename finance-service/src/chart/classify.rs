//! Per-record classification into collected / pending / overdue.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::chart::bucket::DatedFee;
use crate::models::FeeStatus;

/// Monetary contributions of one record within one bucket it was assigned
/// to. Amounts stay exact here; rounding happens once, at aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contribution {
    pub collected: Decimal,
    pub pending: Decimal,
    pub overdue: Decimal,
}

impl Contribution {
    pub fn add(&mut self, other: Contribution) {
        self.collected += other.collected;
        self.pending += other.pending;
        self.overdue += other.overdue;
    }
}

/// Classify one record against "today".
///
/// A partially paid record contributes its paid amount to `collected` and
/// its remainder to `pending` or `overdue` in the same bucket, so the same
/// record shows up in two columns. That mirrors how payments have always
/// been reported here; see DESIGN.md before changing it.
pub fn classify(dated: &DatedFee<'_>, today: NaiveDate) -> Contribution {
    let fee = dated.fee;
    let remaining = fee.amount - fee.paid_amount;
    let mut contribution = Contribution::default();

    match fee.status() {
        FeeStatus::Paid => contribution.collected += fee.paid_amount,
        FeeStatus::Pending => {
            if dated.due < today {
                contribution.overdue += remaining;
            } else {
                contribution.pending += remaining;
            }
        }
    }

    if fee.paid_amount > Decimal::ZERO && fee.status() != FeeStatus::Paid {
        contribution.collected += fee.paid_amount;
    }

    contribution
}
