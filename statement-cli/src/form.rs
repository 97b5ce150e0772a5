//! Statement form files: the customer, loan, billing-period and format values a
//! statement is requested for.
//!
//! Forms are TOML (or JSON when the file ends in `.json`). Loans can additionally be
//! imported from a CSV whose headers are the loan field names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use statement_core::{
    build_statement_request, BillingPeriod, Customer, Loan, StatementFormat, StatementRequest,
    StatementResult,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatementForm {
    pub billing_period_start: String,
    pub billing_period_end: String,
    pub statement_format: StatementFormat,
    pub customers: Vec<Customer>,
    pub loans: Vec<Loan>,
}

impl StatementForm {
    /// Blank form with `customers` empty customer entries (at least one) and one empty loan.
    pub fn template(customers: usize, format: StatementFormat) -> Self {
        Self {
            statement_format: format,
            customers: vec![Customer::default(); customers.max(1)],
            loans: vec![Loan::default()],
            ..Self::default()
        }
    }

    pub fn billing_period(&self) -> BillingPeriod {
        BillingPeriod::new(self.billing_period_start.clone(), self.billing_period_end.clone())
    }

    pub fn set_billing_period(&mut self, period: BillingPeriod) {
        self.billing_period_start = period.start;
        self.billing_period_end = period.end;
    }

    pub fn into_request(self) -> StatementResult<StatementRequest> {
        let period = self.billing_period();
        build_statement_request(self.customers, self.loans, period, self.statement_format)
    }
}

pub fn load_form(path: &Path) -> Result<StatementForm> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_form_json(&s).with_context(|| format!("parse {}", path.display()))
    } else {
        parse_form_toml(&s).with_context(|| format!("parse {}", path.display()))
    }
}

pub fn parse_form_toml(s: &str) -> Result<StatementForm> {
    Ok(toml::from_str(s)?)
}

pub fn parse_form_json(s: &str) -> Result<StatementForm> {
    Ok(serde_json::from_str(s)?)
}

/// Read loans from a CSV export. Every cell is kept as text; unknown columns are ignored.
pub fn load_loans_csv(path: &Path) -> Result<Vec<Loan>> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_loans(rdr).with_context(|| format!("parsing {}", path.display()))
}

fn read_loans<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Loan>> {
    let mut loans = Vec::new();
    for (i, row) in rdr.deserialize::<HashMap<String, String>>().enumerate() {
        let row = row.with_context(|| format!("row {}", i + 1))?;
        let loan: Loan = serde_json::from_value(serde_json::to_value(row)?)
            .with_context(|| format!("row {}", i + 1))?;
        loans.push(loan);
    }
    Ok(loans)
}
