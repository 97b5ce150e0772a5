//! Billing period helpers.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Start and end of a billing period as ISO-8601 dates (YYYY-MM-DD).
///
/// No ordering is enforced here; the statement service validates the range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingPeriod {
    pub start: String,
    pub end: String,
}

impl BillingPeriod {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The full calendar month before `today`, e.g. 2026-03-10 -> 2026-02-01..2026-02-28.
    pub fn previous_month(today: NaiveDate) -> Self {
        let first_this_month = today.with_day(1).unwrap_or(today);
        let last_prev = first_this_month.pred_opt().unwrap_or(first_this_month);
        let first_prev = first_this_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(last_prev);

        Self::new(
            first_prev.format("%Y-%m-%d").to_string(),
            last_prev.format("%Y-%m-%d").to_string(),
        )
    }

    /// True when neither bound has been filled in.
    pub fn is_blank(&self) -> bool {
        self.start.trim().is_empty() && self.end.trim().is_empty()
    }
}
