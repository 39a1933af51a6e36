use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::config::Config;
use crate::{OverpassError, Result};

/// Raw success payload of one Overpass round trip
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: String,
    pub content_type: String,
}

/// Blocking transport for the Overpass endpoint. One POST per call, no
/// retries and no backoff; rate limiting is the caller's problem.
#[derive(Debug, Clone)]
pub struct Transport {
    config: Config,
    client: reqwest::blocking::Client,
}

impl Transport {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| OverpassError::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| OverpassError::Config(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| OverpassError::Config(format!("invalid proxy url: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Send a complete query as the `data` form field and return the raw
    /// body with its declared content type.
    pub fn send(&self, query: &str) -> Result<RawResponse> {
        debug!("sending query to {}: {}", self.config.endpoint, query);

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", query)])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    OverpassError::Timeout(self.config.timeout)
                } else {
                    OverpassError::Network(e)
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(classify_status(status, query, self.config.timeout));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text()?;
        debug!("received {} bytes ({})", body.len(), content_type);

        Ok(RawResponse { body, content_type })
    }
}

/// Map a non-200 status to the matching error kind. A 400 carries the
/// offending query back to the caller, a 504 the timeout in force.
pub fn classify_status(status: u16, query: &str, timeout: Duration) -> OverpassError {
    match status {
        400 => OverpassError::Syntax(query.to_string()),
        429 => OverpassError::TooManyRequests,
        504 => OverpassError::ServerOverloaded(timeout),
        other => OverpassError::UnknownServerError(other),
    }
}
