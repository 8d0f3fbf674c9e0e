//! Wire and result types shared across the gateway.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Response envelope shared by all partner services:
/// `{ success: bool, data?: ..., error?: string }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the data payload, turning `success: false` or a missing
    /// payload into an upstream application error.
    pub fn into_data(self, endpoint: &str) -> Result<T> {
        if !self.success {
            return Err(GatewayError::Upstream {
                endpoint: endpoint.to_string(),
                message: self
                    .error
                    .unwrap_or_else(|| "unspecified upstream error".to_string()),
            });
        }
        self.data.ok_or_else(|| GatewayError::Upstream {
            endpoint: endpoint.to_string(),
            message: "success response carried no data payload".to_string(),
        })
    }
}

/// Combined stock and region facts for one option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionAvailability {
    pub option_id: String,
    /// Remaining units, absent when the inventory service gave no answer.
    pub stock: Option<u32>,
    pub has_stock: bool,
    /// Absent when the region service gave no answer; absence means
    /// "not restricted".
    pub region_allowed: Option<bool>,
    pub available: bool,
}

impl OptionAvailability {
    /// Derive the availability flag: stock on hand, and not explicitly
    /// restricted in the caller's region.
    pub fn derive(
        option_id: impl Into<String>,
        stock: Option<u32>,
        region_allowed: Option<bool>,
    ) -> Self {
        let has_stock = stock.map(|units| units > 0).unwrap_or(false);
        let available = has_stock && region_allowed.unwrap_or(true);
        Self {
            option_id: option_id.into(),
            stock,
            has_stock,
            region_allowed,
            available,
        }
    }
}

/// Availability facts keyed by option id, scoped to one aggregation call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionAvailabilityResult {
    pub options: HashMap<String, OptionAvailability>,
}

impl OptionAvailabilityResult {
    pub fn get(&self, option_id: &str) -> Option<&OptionAvailability> {
        self.options.get(option_id)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn available_ids(&self) -> Vec<String> {
        self.filtered(|option| option.available)
    }

    pub fn unavailable_ids(&self) -> Vec<String> {
        self.filtered(|option| !option.available)
    }

    pub fn out_of_stock_ids(&self) -> Vec<String> {
        self.filtered(|option| !option.has_stock)
    }

    pub fn region_restricted_ids(&self) -> Vec<String> {
        self.filtered(|option| option.region_allowed == Some(false))
    }

    // The backing map is unordered; sort so callers see stable output.
    fn filtered(&self, predicate: impl Fn(&OptionAvailability) -> bool) -> Vec<String> {
        let mut ids: Vec<String> = self
            .options
            .values()
            .filter(|option| predicate(option))
            .map(|option| option.option_id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    /// At least one configured service is unhealthy; the gateway keeps
    /// serving with reduced data fidelity.
    Degraded,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// Probe outcome for one backing service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate of one health sweep across all configured services.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub overall: OverallStatus,
    pub services: HashMap<String, ServiceHealth>,
    pub checked_at: DateTime<Utc>,
}

/// Resolved address for a postal code.
#[derive(Debug, Clone, Serialize)]
pub struct AddressInfo {
    /// First three digits of the postal code.
    pub postal_code1: String,
    /// Last four digits of the postal code.
    pub postal_code2: String,
    pub prefecture: String,
    pub city: String,
    pub town: Option<String>,
    /// Prefecture, city and town concatenated for display.
    pub full_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_truth_table() {
        // stock absent -> unavailable
        assert!(!OptionAvailability::derive("A", None, None).available);
        // stock zero -> unavailable
        assert!(!OptionAvailability::derive("A", Some(0), None).available);
        // stock > 0, region unknown -> available (absence is not restriction)
        assert!(OptionAvailability::derive("A", Some(3), None).available);
        // stock > 0, region allowed -> available
        assert!(OptionAvailability::derive("A", Some(3), Some(true)).available);
        // stock > 0, region restricted -> unavailable
        assert!(!OptionAvailability::derive("A", Some(3), Some(false)).available);
    }

    #[test]
    fn test_envelope_success_false_is_upstream_error() {
        let envelope: ApiEnvelope<u32> = ApiEnvelope {
            success: false,
            data: None,
            error: Some("stock backend offline".to_string()),
        };
        let err = envelope.into_data("/api/inventory/check").unwrap_err();
        match err {
            GatewayError::Upstream { message, .. } => {
                assert_eq!(message, "stock backend offline");
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_missing_data_is_upstream_error() {
        let envelope: ApiEnvelope<u32> = ApiEnvelope {
            success: true,
            data: None,
            error: None,
        };
        assert!(envelope.into_data("/api/inventory/check").is_err());
    }

    #[test]
    fn test_result_views_are_sorted() {
        let mut options = HashMap::new();
        for (id, stock, region) in [
            ("OPT-C", Some(5), Some(true)),
            ("OPT-A", Some(2), None),
            ("OPT-B", Some(0), Some(false)),
        ] {
            options.insert(
                id.to_string(),
                OptionAvailability::derive(id, stock, region),
            );
        }
        let result = OptionAvailabilityResult { options };

        assert_eq!(result.available_ids(), vec!["OPT-A", "OPT-C"]);
        assert_eq!(result.unavailable_ids(), vec!["OPT-B"]);
        assert_eq!(result.out_of_stock_ids(), vec!["OPT-B"]);
        assert_eq!(result.region_restricted_ids(), vec!["OPT-B"]);
    }
}
