//! Statement client: routes a request to its endpoint and returns the rendered file.

use statement_core::{Endpoint, StatementRequest};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpTransport, StatementTransport};

/// Submits statement requests over a [`StatementTransport`].
///
/// Holds no per-request state; every `submit` is an independent call.
pub struct StatementClient<T = HttpTransport> {
    transport: T,
}

impl StatementClient<HttpTransport> {
    pub fn from_base_url(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        Ok(Self::new(HttpTransport::with_timeout(base_url, timeout)?))
    }
}

impl<T: StatementTransport> StatementClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` to the endpoint for its variant and return the response body.
    ///
    /// A non-2xx answer becomes [`ClientError::RemoteStatement`] with the body read as
    /// text. A 2xx body is returned as-is. Nothing is retried.
    pub async fn submit(&self, request: &StatementRequest) -> ClientResult<Vec<u8>> {
        let endpoint = Endpoint::for_request(request);
        let body = serde_json::to_vec(request)?;

        debug!(
            %endpoint,
            kind = %request.kind(),
            customers = request.customers().len(),
            loans = request.loans().len(),
            format = %request.statement_format(),
            "submitting statement request"
        );

        let response = self.transport.post_json(endpoint.path(), body).await?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, %endpoint, "statement service rejected request");
            return Err(ClientError::RemoteStatement {
                status: response.status,
                body,
            });
        }

        info!(%endpoint, bytes = response.body.len(), "statement received");
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use crate::transport::RawResponse;
    use statement_core::{build_statement_request, BillingPeriod, Customer, StatementFormat};

    fn request(names: &[&str]) -> StatementRequest {
        let customers = names
            .iter()
            .enumerate()
            .map(|(i, n)| Customer::new(format!("C-{i}"), *n))
            .collect();
        build_statement_request(
            customers,
            vec![],
            BillingPeriod::new("2026-01-01", "2026-01-31"),
            StatementFormat::Pdf,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_request_hits_single_endpoint() {
        let client = StatementClient::new(RecordingTransport::ok(b"%PDF-1.7".to_vec()));
        let payload = client.submit(&request(&["Jane Doe"])).await.unwrap();

        assert_eq!(payload, b"%PDF-1.7");
        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/statements");
        assert_eq!(calls[0].json()["customer"]["name"], "Jane Doe");
        assert!(calls[0].json().get("customers").is_none());
    }

    #[tokio::test]
    async fn test_multi_request_hits_multi_endpoint() {
        let client = StatementClient::new(RecordingTransport::ok(b"xlsx-bytes".to_vec()));
        client.submit(&request(&["Jane Doe", "John Smith"])).await.unwrap();

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/generate-statement");
        assert_eq!(calls[0].json()["customers"][1]["name"], "John Smith");
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let client = StatementClient::new(RecordingTransport::respond(RawResponse::new(
            500,
            "server exploded",
        )));
        let err = client.submit(&request(&["Jane Doe"])).await.unwrap_err();

        match err {
            ClientError::RemoteStatement { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "server exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.transport().calls().len(), 1, "no retry");
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let client = StatementClient::new(RecordingTransport::unreachable("connection refused"));
        let err = client.submit(&request(&["A", "B"])).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(ref m) if m == "connection refused"));
        assert_eq!(client.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_success_body_is_opaque() {
        let bytes = vec![0u8, 159, 146, 150, 255];
        let client = StatementClient::new(RecordingTransport::ok(bytes.clone()));
        assert_eq!(client.submit(&request(&["Jane"])).await.unwrap(), bytes);
    }
}
