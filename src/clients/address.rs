//! Postal-code resolution against the address service.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::http::ResilientJsonClient;
use crate::models::{AddressInfo, ApiEnvelope};

const SEARCH_PATH: &str = "/api/address/search";

// Accepts "100-0005" and "1000005".
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-?\d{4}$").unwrap());

#[derive(Debug, Serialize)]
struct AddressSearchRequest<'a> {
    postal_code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AddressSearchData {
    prefecture: String,
    city: String,
    #[serde(default)]
    town: Option<String>,
}

/// Validate and normalize a postal code to its 7-digit form.
///
/// Malformed input is a validation error and is never sent upstream.
pub fn normalize_postal_code(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !POSTAL_CODE_RE.is_match(trimmed) {
        return Err(GatewayError::InvalidInput(format!(
            "malformed postal code: {raw:?}"
        )));
    }
    Ok(trimmed.replace('-', ""))
}

/// Client for the address lookup endpoint.
pub struct AddressClient {
    http: ResilientJsonClient,
}

impl AddressClient {
    pub fn new(http: ResilientJsonClient) -> Self {
        Self { http }
    }

    /// Resolve a postal code to a structured address.
    pub async fn search(&self, postal_code: &str) -> Result<AddressInfo> {
        let normalized = normalize_postal_code(postal_code)?;

        let request = AddressSearchRequest {
            postal_code: &normalized,
        };
        let envelope: ApiEnvelope<AddressSearchData> = self
            .http
            .send(Method::POST, SEARCH_PATH, Some(&request))
            .await?;
        let data = envelope.into_data(SEARCH_PATH)?;

        let full_address = format!(
            "{}{}{}",
            data.prefecture,
            data.city,
            data.town.as_deref().unwrap_or("")
        );

        Ok(AddressInfo {
            postal_code1: normalized[..3].to_string(),
            postal_code2: normalized[3..].to_string(),
            prefecture: data.prefecture,
            city: data.city,
            town: data.town,
            full_address,
        })
    }
}
