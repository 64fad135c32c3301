use crate::error::{FetchError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// Default HTTP client timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header name the sports statistics API expects the key under
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Authentication header sent with every request
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    name: String,
    value: String,
}

impl AuthHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// `Ocp-Apim-Subscription-Key: <key>`
    pub fn subscription_key(key: impl Into<String>) -> Self {
        Self::new(SUBSCRIPTION_KEY_HEADER, key)
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self::new(AUTHORIZATION.as_str(), format!("Bearer {}", token.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn to_header_map(&self) -> Result<HeaderMap> {
        let name = HeaderName::from_bytes(self.name.as_bytes())
            .map_err(|e| FetchError::invalid_header(format!("{}: {}", self.name, e)))?;
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|e| FetchError::invalid_header(format!("value for {}: {}", self.name, e)))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        Ok(headers)
    }
}

// Keeps keys and tokens out of logged configuration
impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Fetches JSON record arrays from an authenticated REST endpoint
pub struct ApiFetcher {
    client: Client,
    headers: HeaderMap,
}

impl ApiFetcher {
    /// Create a new fetcher instance
    pub fn new(auth: AuthHeader, timeout: Duration) -> Result<Self> {
        let headers = auth.to_header_map()?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, headers })
    }

    /// Create a fetcher with the default timeout
    pub fn with_default_timeout(auth: AuthHeader) -> Result<Self> {
        Self::new(auth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Fetch the records at `url`, reporting every failure as an error
    pub async fn try_fetch(&self, url: &str) -> Result<Vec<Value>> {
        info!("Fetching records from: {}", url);

        let response = self.client.get(url).headers(self.headers.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status { status, url: url.to_string() });
        }

        let body = response.bytes().await?;
        let parsed: Value = serde_json::from_slice(&body)
            .map_err(|source| FetchError::Parse { url: url.to_string(), source })?;

        match parsed {
            Value::Array(records) => Ok(records),
            other => Err(FetchError::NotAnArray { url: url.to_string(), kind: json_kind(&other) }),
        }
    }

    /// Fetch the records at `url`; any failure is logged and yields an empty result
    pub async fn fetch(&self, url: &str) -> Vec<Value> {
        match self.try_fetch(url).await {
            Ok(records) => {
                info!("Successfully fetched {} records from {}", records.len(), url);
                records
            }
            Err(e @ FetchError::NotAnArray { .. }) => {
                warn!("Discarding response: {}", e);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to fetch records: {}", e);
                Vec::new()
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
