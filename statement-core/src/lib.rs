//! statement-core: domain types and pure logic for loan statement requests

pub mod builder;
pub mod error;
pub mod filename;
pub mod model;
pub mod period;
pub mod routing;

pub use builder::build_statement_request;
pub use error::{StatementError, StatementResult};
pub use filename::{filename_stem, statement_filename};
pub use model::{
    customers_from_value, is_multi_customer_shape, is_single_customer_shape, Customer, Loan,
    MultiCustomerRequest, RequestKind, SingleCustomerRequest, StatementFormat, StatementRequest,
};
pub use period::BillingPeriod;
pub use routing::Endpoint;
