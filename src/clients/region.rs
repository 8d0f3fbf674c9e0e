//! Region-restriction lookups against the region service.

use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;
use tracing::warn;

use crate::error::{GatewayError, Result};
use crate::http::ResilientJsonClient;
use crate::models::ApiEnvelope;

const CHECK_PATH: &str = "/api/region/check";

#[derive(Debug, Serialize)]
struct RegionCheckRequest<'a> {
    prefecture: &'a str,
    city: &'a str,
    option_ids: &'a [String],
}

/// Client for the region restriction-check endpoint.
pub struct RegionClient {
    http: ResilientJsonClient,
}

impl RegionClient {
    pub fn new(http: ResilientJsonClient) -> Self {
        Self { http }
    }

    /// Whether each option is permitted in the given prefecture/city.
    ///
    /// Ids the service did not report default to `false`: the opposite
    /// polarity from the inventory default, because an unknown restriction
    /// must not be assumed permissive.
    pub async fn check_restrictions(
        &self,
        prefecture: &str,
        city: &str,
        option_ids: &[String],
    ) -> Result<HashMap<String, bool>> {
        if prefecture.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "prefecture must not be empty".to_string(),
            ));
        }
        if city.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "city must not be empty".to_string(),
            ));
        }
        if option_ids.is_empty() {
            return Err(GatewayError::InvalidInput(
                "option_ids must not be empty".to_string(),
            ));
        }

        let request = RegionCheckRequest {
            prefecture,
            city,
            option_ids,
        };
        let envelope: ApiEnvelope<HashMap<String, bool>> = self
            .http
            .send(Method::POST, CHECK_PATH, Some(&request))
            .await?;
        let mut allowed = envelope.into_data(CHECK_PATH)?;

        for id in option_ids {
            if !allowed.contains_key(id) {
                warn!(option_id = %id, "region response omitted requested id, assuming not allowed");
                allowed.insert(id.clone(), false);
            }
        }

        Ok(allowed)
    }
}
