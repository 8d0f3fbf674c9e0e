//! Stock-level lookups against the inventory service.

use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;
use tracing::warn;

use crate::error::{GatewayError, Result};
use crate::http::ResilientJsonClient;
use crate::models::ApiEnvelope;

const CHECK_PATH: &str = "/api/inventory/check";

#[derive(Debug, Serialize)]
struct StockCheckRequest<'a> {
    option_ids: &'a [String],
}

/// Client for the inventory stock-check endpoint.
pub struct InventoryClient {
    http: ResilientJsonClient,
}

impl InventoryClient {
    pub fn new(http: ResilientJsonClient) -> Self {
        Self { http }
    }

    /// Remaining stock per option id, fetched in one request.
    ///
    /// Ids the service did not report come back as zero units rather than
    /// being dropped: an unknown stock level must not read as "in stock".
    pub async fn check_stock(&self, option_ids: &[String]) -> Result<HashMap<String, u32>> {
        if option_ids.is_empty() {
            return Err(GatewayError::InvalidInput(
                "option_ids must not be empty".to_string(),
            ));
        }

        let request = StockCheckRequest { option_ids };
        let envelope: ApiEnvelope<HashMap<String, u32>> = self
            .http
            .send(Method::POST, CHECK_PATH, Some(&request))
            .await?;
        let mut stock = envelope.into_data(CHECK_PATH)?;

        for id in option_ids {
            if !stock.contains_key(id) {
                warn!(option_id = %id, "inventory response omitted requested id, assuming out of stock");
                stock.insert(id.clone(), 0);
            }
        }

        Ok(stock)
    }
}
