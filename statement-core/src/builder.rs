//! Request builder: turns form values into the right statement request variant.
//!
//! Pure and side-effect free. One customer yields a single-customer request; two or
//! more yield a joint (multi-customer) request with the list kept in order.

use crate::error::{StatementError, StatementResult};
use crate::model::{
    Customer, Loan, MultiCustomerRequest, SingleCustomerRequest, StatementFormat,
    StatementRequest,
};
use crate::period::BillingPeriod;

/// Build a statement request from the current form values.
///
/// Fails with [`StatementError::EmptyCustomerList`] when `customers` is empty.
/// Loans and dates are passed through without validation.
pub fn build_statement_request(
    customers: Vec<Customer>,
    loans: Vec<Loan>,
    period: BillingPeriod,
    format: StatementFormat,
) -> StatementResult<StatementRequest> {
    let BillingPeriod { start, end } = period;

    match <[Customer; 1]>::try_from(customers) {
        Ok([customer]) => Ok(StatementRequest::Single(SingleCustomerRequest {
            customer,
            loans,
            billing_period_start: start,
            billing_period_end: end,
            statement_format: format,
        })),
        Err(customers) if customers.is_empty() => Err(StatementError::EmptyCustomerList),
        Err(customers) => Ok(StatementRequest::Multi(MultiCustomerRequest {
            customers,
            loans,
            billing_period_start: start,
            billing_period_end: end,
            statement_format: format,
        })),
    }
}
