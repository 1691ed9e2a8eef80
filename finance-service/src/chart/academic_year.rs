//! Academic-year label parsing and defaulting.
//!
//! An academic year is the July-June reporting period labelled
//! `"<startYear>-<endYear>"`. The label is not a stored entity; it is
//! re-derived and validated on every request.

use chrono::{Datelike, NaiveDate};

/// A validated academic year.
///
/// `label` keeps the exact text used for store filtering (fee rows carry
/// the label verbatim); `start_year`/`end_year` drive month bucketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicYear {
    pub start_year: i32,
    pub end_year: i32,
    pub label: String,
}

impl AcademicYear {
    /// Parse a `"<digits>-<digits>"` label. Exactly one separator, both
    /// halves must be integers; anything else is rejected.
    pub fn parse(label: &str) -> Option<Self> {
        let (start, end) = label.split_once('-')?;
        if end.contains('-') {
            return None;
        }
        let start_year = start.parse::<i32>().ok()?;
        let end_year = end.parse::<i32>().ok()?;
        Some(Self {
            start_year,
            end_year,
            label: label.to_string(),
        })
    }

    /// The academic year `today` falls in: July or later starts a new
    /// label, January-June still belongs to the previous one.
    pub fn default_for(today: NaiveDate) -> Self {
        let year = today.year();
        let (start_year, end_year) = if today.month() >= 7 {
            (year, year + 1)
        } else {
            (year - 1, year)
        };
        Self {
            start_year,
            end_year,
            label: format!("{}-{}", start_year, end_year),
        }
    }

    /// Resolve an optional requested label, falling back to the default
    /// for `today`. `None` means the requested label was malformed.
    pub fn resolve(requested: Option<&str>, today: NaiveDate) -> Option<Self> {
        match requested {
            Some(label) => Self::parse(label),
            None => Some(Self::default_for(today)),
        }
    }
}
