//! Endpoint routing: which statement service path a request goes to.
//!
//! Decided once from the request variant. There is no fallback or re-routing.

use crate::model::{RequestKind, StatementRequest};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /api/statements`, single-customer requests.
    SingleStatement,
    /// `POST /api/generate-statement`, joint statements.
    MultiStatement,
}

impl Endpoint {
    pub fn for_kind(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Single => Endpoint::SingleStatement,
            RequestKind::Multi => Endpoint::MultiStatement,
        }
    }

    pub fn for_request(request: &StatementRequest) -> Self {
        Self::for_kind(request.kind())
    }

    /// Path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::SingleStatement => "/api/statements",
            Endpoint::MultiStatement => "/api/generate-statement",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POST {}", self.path())
    }
}
