//! HTTP plumbing shared by the domain clients.

pub mod client;
pub mod transport;

pub use client::ResilientJsonClient;
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
