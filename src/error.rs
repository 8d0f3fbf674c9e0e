//! Error types for the integration layer.
//!
//! The taxonomy separates three situations the caller must handle
//! differently: bad input (fix the request), an exhausted retry budget
//! (the upstream is unreachable), and an explicit upstream rejection
//! (reachable, but the request was refused).

use thiserror::Error;

use crate::http::transport::TransportError;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error type for all gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The caller passed malformed or empty arguments. Nothing was sent
    /// over the network.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A client or transport could not be constructed from configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Every attempt in the retry budget failed. Wraps the last failure.
    #[error("request to {endpoint} failed after {attempts} attempts")]
    Exhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        source: AttemptError,
    },

    /// The upstream answered 4xx. The request is permanently invalid, so
    /// it was not retried.
    #[error("upstream rejected {endpoint} with status {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The upstream was reachable and answered 2xx, but reported
    /// `success: false` in the response envelope.
    #[error("upstream error from {endpoint}: {message}")]
    Upstream { endpoint: String, message: String },

    /// The per-call deadline elapsed before the retry loop finished. Any
    /// in-flight attempt was abandoned.
    #[error("deadline of {timeout_ms}ms exceeded for {endpoint}")]
    DeadlineExceeded { endpoint: String, timeout_ms: u64 },
}

/// The last failure observed inside the retry loop.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A non-2xx, non-4xx status (in practice 5xx).
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx body that did not match the expected shape.
    #[error("response body did not decode: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// True for errors the caller can fix by correcting the request.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GatewayError::InvalidInput(_))
    }
}
