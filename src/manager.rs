//! Aggregation across the external services.
//!
//! The manager owns whichever domain clients are configured, combines
//! their answers into per-option availability, and runs the health sweep.
//! A failed upstream never fails the aggregate call: the corresponding
//! facts are simply absent from the result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::clients::{AddressClient, InventoryClient, RegionClient};
use crate::config::{GatewayConfig, ServiceEndpointConfig};
use crate::error::{GatewayError, Result};
use crate::http::{HttpTransport, ReqwestTransport, ResilientJsonClient};
use crate::models::{
    AddressInfo, HealthCheckResult, HealthStatus, OptionAvailability, OptionAvailabilityResult,
    OverallStatus, ServiceHealth,
};

// Health probes reuse the real call paths with fixed sentinel payloads so a
// probe exercises end-to-end reachability including JSON decoding.
const SENTINEL_OPTION_ID: &str = "HEALTHCHECK";
const SENTINEL_PREFECTURE: &str = "東京都";
const SENTINEL_CITY: &str = "千代田区";
const SENTINEL_POSTAL_CODE: &str = "1000001";

/// Owns the configured domain clients and aggregates their results.
///
/// Dependencies are assigned once at construction; the manager holds no
/// mutable state and is safe for concurrent use.
pub struct IntegrationManager {
    inventory: Option<InventoryClient>,
    region: Option<RegionClient>,
    address: Option<AddressClient>,
}

impl IntegrationManager {
    pub fn new(
        inventory: Option<InventoryClient>,
        region: Option<RegionClient>,
        address: Option<AddressClient>,
    ) -> Self {
        Self {
            inventory,
            region,
            address,
        }
    }

    /// Build a manager with a reqwest transport per configured service.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(Self::new(
            config
                .inventory
                .as_ref()
                .map(|c| Ok::<_, GatewayError>(InventoryClient::new(reqwest_client(c)?)))
                .transpose()?,
            config
                .region
                .as_ref()
                .map(|c| Ok::<_, GatewayError>(RegionClient::new(reqwest_client(c)?)))
                .transpose()?,
            config
                .address
                .as_ref()
                .map(|c| Ok::<_, GatewayError>(AddressClient::new(reqwest_client(c)?)))
                .transpose()?,
        ))
    }

    /// Build a manager whose configured services all share one transport.
    /// Used by tests to substitute a scripted fake.
    pub fn with_transport(config: &GatewayConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let client = |c: &ServiceEndpointConfig| {
            ResilientJsonClient::new(Arc::clone(&transport), c.clone())
        };
        Self::new(
            config.inventory.as_ref().map(|c| InventoryClient::new(client(c))),
            config.region.as_ref().map(|c| RegionClient::new(client(c))),
            config.address.as_ref().map(|c| AddressClient::new(client(c))),
        )
    }

    /// Combined availability for every requested option.
    ///
    /// Each upstream is consulted only when configured (and, for region,
    /// only when both prefecture and city are given). An upstream failure
    /// is logged and its facts left absent; the call itself only fails on
    /// invalid input. Every requested id appears exactly once in the
    /// result.
    pub async fn check_option_availability(
        &self,
        prefecture: &str,
        city: &str,
        option_ids: &[String],
    ) -> Result<OptionAvailabilityResult> {
        if option_ids.is_empty() {
            return Err(GatewayError::InvalidInput(
                "option_ids must not be empty".to_string(),
            ));
        }

        let stock = match &self.inventory {
            Some(client) => match client.check_stock(option_ids).await {
                Ok(map) => Some(map),
                Err(e) => {
                    warn!(error = %e, "inventory check failed, continuing without stock data");
                    None
                }
            },
            None => None,
        };

        let region = match &self.region {
            Some(client) if !prefecture.trim().is_empty() && !city.trim().is_empty() => {
                match client.check_restrictions(prefecture, city, option_ids).await {
                    Ok(map) => Some(map),
                    Err(e) => {
                        warn!(error = %e, "region check failed, continuing without region data");
                        None
                    }
                }
            }
            _ => None,
        };

        let mut options = HashMap::with_capacity(option_ids.len());
        for id in option_ids {
            let units = stock.as_ref().and_then(|map| map.get(id).copied());
            let allowed = region.as_ref().and_then(|map| map.get(id).copied());
            options.insert(id.clone(), OptionAvailability::derive(id, units, allowed));
        }

        Ok(OptionAvailabilityResult { options })
    }

    /// Resolve a postal code through the address service.
    pub async fn lookup_address(&self, postal_code: &str) -> Result<AddressInfo> {
        match &self.address {
            Some(client) => client.search(postal_code).await,
            None => Err(GatewayError::Config(
                "address service is not configured".to_string(),
            )),
        }
    }

    /// Probe every configured service over its real call path.
    ///
    /// Overall status is degraded as soon as one configured service is
    /// unhealthy; unconfigured services are not included at all.
    pub async fn health_check(&self) -> HealthCheckResult {
        let mut services = HashMap::new();

        if let Some(client) = &self.inventory {
            let probe = client
                .check_stock(&[SENTINEL_OPTION_ID.to_string()])
                .await
                .map(|_| ());
            services.insert("inventory".to_string(), service_health("inventory", probe));
        }

        if let Some(client) = &self.region {
            let probe = client
                .check_restrictions(
                    SENTINEL_PREFECTURE,
                    SENTINEL_CITY,
                    &[SENTINEL_OPTION_ID.to_string()],
                )
                .await
                .map(|_| ());
            services.insert("region".to_string(), service_health("region", probe));
        }

        if let Some(client) = &self.address {
            let probe = client.search(SENTINEL_POSTAL_CODE).await.map(|_| ());
            services.insert("address".to_string(), service_health("address", probe));
        }

        let overall = if services
            .values()
            .any(|service| service.status == HealthStatus::Unhealthy)
        {
            OverallStatus::Degraded
        } else {
            OverallStatus::Healthy
        };

        HealthCheckResult {
            overall,
            services,
            checked_at: Utc::now(),
        }
    }
}

fn reqwest_client(config: &ServiceEndpointConfig) -> Result<ResilientJsonClient> {
    let transport = ReqwestTransport::new(config.timeout)
        .map_err(|e| GatewayError::Config(format!("failed to build HTTP transport: {e}")))?;
    Ok(ResilientJsonClient::new(Arc::new(transport), config.clone()))
}

fn service_health(name: &str, probe: Result<()>) -> ServiceHealth {
    match probe {
        Ok(()) => ServiceHealth {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            error: None,
        },
        Err(e) => {
            warn!(service = name, error = %e, "health probe failed");
            ServiceHealth {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                error: Some(e.to_string()),
            }
        }
    }
}
