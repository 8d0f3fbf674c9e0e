//! Transport seam between the retry loop and the network.
//!
//! [`HttpTransport`] is a single execute-request-get-response operation so
//! tests can substitute a deterministic fake without opening a socket.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// One outbound request. The body, if any, is already serialized to JSON.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// Raw response: status plus undecoded body bytes.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Truncated body text for error messages.
    pub fn body_excerpt(&self) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(200)
            .collect()
    }
}

/// Connection-level failure for a single attempt.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,
}

/// Abstract network call. Production uses [`ReqwestTransport`]; tests
/// supply scripted fakes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport used in production.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose single-attempt timeout matches the
    /// per-service request timeout.
    pub fn new(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("option-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let ok = TransportResponse {
            status: 204,
            body: vec![],
        };
        assert!(ok.is_success());
        assert!(!ok.is_client_error());

        let rejected = TransportResponse {
            status: 404,
            body: vec![],
        };
        assert!(!rejected.is_success());
        assert!(rejected.is_client_error());

        let server_error = TransportResponse {
            status: 503,
            body: vec![],
        };
        assert!(!server_error.is_success());
        assert!(!server_error.is_client_error());
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let response = TransportResponse {
            status: 500,
            body: vec![b'x'; 1000],
        };
        assert_eq!(response.body_excerpt().len(), 200);
    }
}
