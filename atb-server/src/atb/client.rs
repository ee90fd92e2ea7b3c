//! AtB InfoTransit HTTP client.
//!
//! Provides async methods for the two InfoTransit operations we use.
//! Handles the SOAP envelope, authentication and concurrency limiting;
//! results are returned as raw DTOs for the caching layer to convert.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::NodeId;

use super::Upstream;
use super::error::AtbError;
use super::soap::{Call, envelope, extract_result};
use super::types::{RawBusStops, RawForecasts};

/// Default InfoTransit endpoint.
pub const DEFAULT_URL: &str = "http://st.atb.no/InfoTransit/userservices.asmx";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the AtB client.
#[derive(Debug, Clone)]
pub struct AtbConfig {
    pub username: String,
    pub password: String,
    /// InfoTransit endpoint (defaults to production)
    pub url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Credentials file layout: `{"Username": "...", "Password": "...", "URL": "..."}`.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "URL", default)]
    url: Option<String>,
}

impl AtbConfig {
    /// Create a new config with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            url: DEFAULT_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Load credentials from a JSON file.
    ///
    /// A missing or empty `URL` falls back to [`DEFAULT_URL`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AtbError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AtbError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse credentials from the JSON config format.
    pub fn from_json(json: &str) -> Result<Self, AtbError> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| AtbError::Json {
            message: e.to_string(),
            body: None,
        })?;

        let config = Self::new(file.username, file.password);
        Ok(match file.url.filter(|u| !u.is_empty()) {
            Some(url) => config.with_url(url),
            None => config,
        })
    }

    /// Set a custom endpoint (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// AtB InfoTransit client.
///
/// Uses a semaphore to limit concurrent requests; InfoTransit is slow and
/// does not cope well with bursts.
#[derive(Debug, Clone)]
pub struct AtbClient {
    http: reqwest::Client,
    url: String,
    username: String,
    password: String,
    semaphore: Arc<Semaphore>,
}

impl AtbClient {
    /// Create a new AtB client with the given configuration.
    pub fn new(config: AtbConfig) -> Result<Self, AtbError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/soap+xml; charset=utf-8"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
            username: config.username,
            password: config.password,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get every bus stop.
    pub async fn get_bus_stops(&self) -> Result<RawBusStops, AtbError> {
        self.call(Call::BusStopsList).await
    }

    /// Get the real-time forecast for a stop.
    pub async fn get_real_time_forecast(&self, node_id: NodeId) -> Result<RawForecasts, AtbError> {
        self.call(Call::RealTimeForecast(node_id)).await
    }

    /// POST a SOAP request and decode the JSON result.
    async fn call<T: DeserializeOwned>(&self, call: Call) -> Result<T, AtbError> {
        let method = call.method();
        let request = envelope(call, &self.username, &self.password)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AtbError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(method = method.name(), "calling AtB");

        let response = self.http.post(&self.url).body(request).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AtbError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AtbError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        let json = extract_result(method, &body)?;

        serde_json::from_str(&json).map_err(|e| AtbError::Json {
            message: e.to_string(),
            body: Some(json.chars().take(500).collect()),
        })
    }
}

#[async_trait]
impl Upstream for AtbClient {
    async fn fetch_stops(&self) -> Result<RawBusStops, AtbError> {
        self.get_bus_stops().await
    }

    async fn fetch_forecast(&self, node_id: NodeId) -> Result<RawForecasts, AtbError> {
        self.get_real_time_forecast(node_id).await
    }
}
