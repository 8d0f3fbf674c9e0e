//! Connection policy for the external services.

use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Per-service connection policy. Built once at startup, immutable after.
#[derive(Debug, Clone)]
pub struct ServiceEndpointConfig {
    pub base_url: String,
    /// Bounds the whole call including retries, not a single attempt.
    pub timeout: Duration,
    pub max_retries: u32,
    /// Fixed delay slept before each retry.
    pub retry_delay: Duration,
}

impl ServiceEndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Read a service config from `<PREFIX>_URL` plus optional
    /// `<PREFIX>_TIMEOUT_MS`, `<PREFIX>_MAX_RETRIES` and
    /// `<PREFIX>_RETRY_DELAY_MS` overrides. Returns `None` when the URL is
    /// unset, meaning the service is not configured.
    pub fn from_env_prefix(prefix: &str) -> Option<Self> {
        let base_url = std::env::var(format!("{prefix}_URL")).ok()?;
        let mut config = Self::new(base_url);

        if let Some(ms) = env_u64(&format!("{prefix}_TIMEOUT_MS")) {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = env_u64(&format!("{prefix}_MAX_RETRIES")) {
            config.max_retries = n as u32;
        }
        if let Some(ms) = env_u64(&format!("{prefix}_RETRY_DELAY_MS")) {
            config.retry_delay = Duration::from_millis(ms);
        }

        Some(config)
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Which external services are wired up. Any of them may be absent; the
/// manager simply skips what is not configured.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub inventory: Option<ServiceEndpointConfig>,
    pub region: Option<ServiceEndpointConfig>,
    pub address: Option<ServiceEndpointConfig>,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            inventory: ServiceEndpointConfig::from_env_prefix("INVENTORY_SERVICE"),
            region: ServiceEndpointConfig::from_env_prefix("REGION_SERVICE"),
            address: ServiceEndpointConfig::from_env_prefix("ADDRESS_SERVICE"),
        }
    }
}
