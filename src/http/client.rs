//! Retrying JSON client shared by all domain clients.
//!
//! Knows nothing about payload semantics: it serializes a request body,
//! runs the retry loop under the per-call deadline, and decodes whatever
//! 2xx body comes back into the caller's type.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::ServiceEndpointConfig;
use crate::error::{AttemptError, GatewayError, Result};
use crate::http::transport::{HttpTransport, TransportError, TransportRequest};

/// JSON-over-HTTP client with a bounded retry/backoff loop.
///
/// Each call is independent: the client holds no mutable state, so a single
/// instance is safe to share across concurrent callers.
pub struct ResilientJsonClient {
    transport: Arc<dyn HttpTransport>,
    config: ServiceEndpointConfig,
}

impl ResilientJsonClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: ServiceEndpointConfig) -> Self {
        Self { transport, config }
    }

    /// Issue a request and decode the JSON response.
    ///
    /// Attempts `1 + max_retries` times, sleeping `retry_delay` before each
    /// retry. A 4xx response stops the loop immediately: the request is
    /// permanently invalid and retrying cannot help. The configured timeout
    /// bounds the entire loop, not a single attempt; if it elapses mid-retry
    /// the in-flight attempt is abandoned.
    pub async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let payload = match body {
            Some(body) => Some(serde_json::to_value(body).map_err(|e| {
                GatewayError::InvalidInput(format!("request body is not serializable: {e}"))
            })?),
            None => None,
        };

        match tokio::time::timeout(
            self.config.timeout,
            self.run_attempts(method, &url, payload),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.config.timeout.as_millis() as u64;
                warn!(endpoint = %url, timeout_ms, "deadline elapsed mid retry loop, abandoning call");
                Err(GatewayError::DeadlineExceeded {
                    endpoint: url,
                    timeout_ms,
                })
            }
        }
    }

    async fn run_attempts<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        payload: Option<Value>,
    ) -> Result<T> {
        let attempts = self.config.max_retries + 1;
        let mut last_error: Option<AttemptError> = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                sleep(self.config.retry_delay).await;
            }
            debug!(endpoint = %url, attempt, "issuing request");

            let request = TransportRequest {
                method: method.clone(),
                url: url.to_string(),
                body: payload.clone(),
            };

            match self.transport.execute(request).await {
                Ok(response) if response.is_success() => {
                    match serde_json::from_slice::<T>(&response.body) {
                        Ok(decoded) => {
                            debug!(endpoint = %url, attempt, "request succeeded");
                            return Ok(decoded);
                        }
                        Err(e) => {
                            warn!(endpoint = %url, attempt, error = %e, "2xx response failed to decode");
                            last_error = Some(AttemptError::Decode(e));
                        }
                    }
                }
                Ok(response) if response.is_client_error() => {
                    warn!(endpoint = %url, attempt, status = response.status, "request rejected, not retrying");
                    return Err(GatewayError::Rejected {
                        endpoint: url.to_string(),
                        status: response.status,
                        body: response.body_excerpt(),
                    });
                }
                Ok(response) => {
                    warn!(endpoint = %url, attempt, status = response.status, "server error");
                    last_error = Some(AttemptError::Status {
                        status: response.status,
                        body: response.body_excerpt(),
                    });
                }
                Err(e) => {
                    warn!(endpoint = %url, attempt, error = %e, "transport failure");
                    last_error = Some(AttemptError::Transport(e));
                }
            }
        }

        error!(endpoint = %url, attempts, "request failed, retry budget exhausted");
        Err(GatewayError::Exhausted {
            endpoint: url.to_string(),
            attempts,
            source: last_error.unwrap_or(AttemptError::Transport(TransportError::Connect(
                "no attempt was made".to_string(),
            ))),
        })
    }
}
