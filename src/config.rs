use std::collections::HashMap;
use std::time::Duration;

use crate::{OverpassError, Result};

/// Public Overpass instance used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Client configuration, fixed at construction and read-only during calls
#[derive(Debug, Clone)]
pub struct Config {
    /// Overpass interpreter URL
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra headers sent with every request, merged over the defaults
    pub headers: HashMap<String, String>,
    /// Optional proxy URL applied to all outbound requests
    pub proxy: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Accept-Charset".to_string(),
            "utf-8;q=0.7,*;q=0.7".to_string(),
        );

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(25),
            headers,
            proxy: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(endpoint) = std::env::var("OVERPASS_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("OVERPASS_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(proxy) = std::env::var("OVERPASS_PROXY") {
            config.proxy = Some(proxy);
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(OverpassError::Config(
                "endpoint must not be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(OverpassError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
