//! Customer, loan and statement request types.
//!
//! Field names follow the statement service's JSON contract (snake_case), so these
//! types serialize straight onto the wire.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{StatementError, StatementResult};
use crate::period::BillingPeriod;

/// A customer as entered on the statement form. All fields are free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Customer {
    pub fn new(customer_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A loan line on the statement.
///
/// Numeric-looking fields are carried as text and passed through untouched. Input
/// documents may give them as numbers; those are rendered to text on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Loan {
    pub loan_id: String,
    pub loan_type: String,
    #[serde(deserialize_with = "text_or_number")]
    pub principal: String,
    #[serde(deserialize_with = "text_or_number")]
    pub interest_rate: String,
    #[serde(deserialize_with = "text_or_number")]
    pub term_months: String,
    #[serde(deserialize_with = "text_or_number")]
    pub current_balance: String,
    pub payment_due_date: String,
    #[serde(deserialize_with = "text_or_number")]
    pub monthly_payment: String,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Unsigned(n)) => n.to_string(),
        Some(TextOrNumber::Signed(n)) => n.to_string(),
        Some(TextOrNumber::Float(n)) => n.to_string(),
    })
}

/// Output format rendered by the statement service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    #[default]
    Pdf,
    Xlsx,
    Txt,
}

impl StatementFormat {
    pub const ALL: [StatementFormat; 3] = [Self::Pdf, Self::Xlsx, Self::Txt];

    /// Wire value, also used as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFormat::Pdf => "pdf",
            StatementFormat::Xlsx => "xlsx",
            StatementFormat::Txt => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementFormat {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" => Ok(Self::Xlsx),
            "txt" => Ok(Self::Txt),
            _ => Err(StatementError::UnknownFormat(s.to_string())),
        }
    }
}

/// Which request shape a statement request has.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Single,
    Multi,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Single => f.write_str("single"),
            RequestKind::Multi => f.write_str("multi"),
        }
    }
}

/// Statement for exactly one customer (`customer` key on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SingleCustomerRequest {
    pub customer: Customer,
    #[serde(default)]
    pub loans: Vec<Loan>,
    pub billing_period_start: String,
    pub billing_period_end: String,
    pub statement_format: StatementFormat,
}

/// Joint statement for several customers (`customers` key on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultiCustomerRequest {
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    pub billing_period_start: String,
    pub billing_period_end: String,
    pub statement_format: StatementFormat,
}

/// A statement request, either single- or multi-customer.
///
/// Serialized untagged: the variant shows up only as the presence of `customer`
/// or `customers`. Deserialization checks that exactly one of the two is present.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatementRequest {
    Single(SingleCustomerRequest),
    Multi(MultiCustomerRequest),
}

impl StatementRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            StatementRequest::Single(_) => RequestKind::Single,
            StatementRequest::Multi(_) => RequestKind::Multi,
        }
    }

    pub fn is_single_customer_request(&self) -> bool {
        matches!(self, StatementRequest::Single(_))
    }

    pub fn is_multi_customer_request(&self) -> bool {
        matches!(self, StatementRequest::Multi(_))
    }

    /// Customers on the request: one for Single, the full list for Multi.
    pub fn customers(&self) -> &[Customer] {
        match self {
            StatementRequest::Single(req) => std::slice::from_ref(&req.customer),
            StatementRequest::Multi(req) => &req.customers,
        }
    }

    pub fn loans(&self) -> &[Loan] {
        match self {
            StatementRequest::Single(req) => &req.loans,
            StatementRequest::Multi(req) => &req.loans,
        }
    }

    pub fn billing_period(&self) -> BillingPeriod {
        let (start, end) = match self {
            StatementRequest::Single(req) => (&req.billing_period_start, &req.billing_period_end),
            StatementRequest::Multi(req) => (&req.billing_period_start, &req.billing_period_end),
        };
        BillingPeriod::new(start.clone(), end.clone())
    }

    pub fn statement_format(&self) -> StatementFormat {
        match self {
            StatementRequest::Single(req) => req.statement_format,
            StatementRequest::Multi(req) => req.statement_format,
        }
    }

    /// Parse an untyped request document, rejecting anything that is not exactly
    /// one of the two shapes.
    pub fn from_value(value: Value) -> StatementResult<Self> {
        let has_single = value.get("customer").is_some();
        let has_multi = value.get("customers").is_some();
        if has_single && has_multi {
            return Err(StatementError::InvalidRequestShape {
                reason: "both `customer` and `customers` are present".to_string(),
            });
        }

        if is_single_customer_shape(&value) {
            let req: SingleCustomerRequest = serde_json::from_value(value).map_err(invalid_shape)?;
            Ok(StatementRequest::Single(req))
        } else if is_multi_customer_shape(&value) {
            let req: MultiCustomerRequest = serde_json::from_value(value).map_err(invalid_shape)?;
            if req.customers.is_empty() {
                return Err(StatementError::EmptyCustomerList);
            }
            Ok(StatementRequest::Multi(req))
        } else {
            Err(StatementError::InvalidRequestShape {
                reason: describe_shape(&value),
            })
        }
    }
}

impl<'de> Deserialize<'de> for StatementRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        StatementRequest::from_value(value).map_err(de::Error::custom)
    }
}

/// Key-presence check on a raw document: has `customer` and no `customers`.
pub fn is_single_customer_shape(value: &Value) -> bool {
    value.get("customer").is_some() && value.get("customers").is_none()
}

/// Key-presence check on a raw document: has `customers` holding an array.
pub fn is_multi_customer_shape(value: &Value) -> bool {
    value.get("customers").is_some_and(Value::is_array)
}

/// Pull the customer list out of a raw request document.
pub fn customers_from_value(value: &Value) -> StatementResult<Vec<Customer>> {
    if is_single_customer_shape(value) {
        let customer = value.get("customer").cloned().unwrap_or(Value::Null);
        let customer: Customer = serde_json::from_value(customer).map_err(invalid_shape)?;
        Ok(vec![customer])
    } else if is_multi_customer_shape(value) {
        let customers = value.get("customers").cloned().unwrap_or(Value::Null);
        serde_json::from_value(customers).map_err(invalid_shape)
    } else {
        Err(StatementError::InvalidRequestShape {
            reason: describe_shape(value),
        })
    }
}

fn invalid_shape(err: serde_json::Error) -> StatementError {
    StatementError::InvalidRequestShape {
        reason: err.to_string(),
    }
}

fn describe_shape(value: &Value) -> String {
    match value.get("customers") {
        Some(other) if !other.is_array() => "`customers` must be an array".to_string(),
        _ if !value.is_object() => "request must be a JSON object".to_string(),
        _ => "expected a `customer` object or a `customers` array".to_string(),
    }
}
