//! Integration layer for the external option-availability services.
//!
//! The signup flow depends on three partner-operated JSON APIs: an inventory
//! service (remaining stock per option), a region service (per-prefecture
//! restrictions), and an address service (postal-code resolution). All three
//! speak the same `{success, data, error}` envelope and all three are reached
//! through [`http::client::ResilientJsonClient`], which owns the retry and
//! timeout policy.
//!
//! [`manager::IntegrationManager`] combines inventory and region answers into
//! a single per-option availability decision and keeps serving when one of
//! the upstreams is down. It also runs the health sweep used by the
//! `gateway-health` binary.

pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod models;

pub use clients::address::AddressClient;
pub use clients::inventory::InventoryClient;
pub use clients::region::RegionClient;
pub use config::{GatewayConfig, ServiceEndpointConfig};
pub use error::{GatewayError, Result};
pub use manager::IntegrationManager;
pub use models::{
    AddressInfo, HealthCheckResult, OptionAvailability, OptionAvailabilityResult, ServiceHealth,
};
