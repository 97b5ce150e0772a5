//! Error type for building and validating statement requests.

use thiserror::Error;

/// Result alias for statement-core operations.
pub type StatementResult<T> = Result<T, StatementError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    /// The builder was handed no customers. The form always keeps at least one entry,
    /// so this is a caller bug.
    #[error("at least one customer is required to build a statement request")]
    EmptyCustomerList,

    /// A raw request document is neither a single- nor a multi-customer request.
    #[error("invalid statement request shape: {reason}")]
    InvalidRequestShape { reason: String },

    #[error("unknown statement format '{0}' (expected pdf, xlsx or txt)")]
    UnknownFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(StatementError::EmptyCustomerList.to_string().contains("at least one customer"));

        let err = StatementError::InvalidRequestShape {
            reason: "missing customer".to_string(),
        };
        assert_eq!(err.to_string(), "invalid statement request shape: missing customer");

        assert!(StatementError::UnknownFormat("docx".into()).to_string().contains("docx"));
    }
}
