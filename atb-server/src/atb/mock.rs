//! Mock AtB client for running without credentials.
//!
//! Serves raw InfoTransit payloads from JSON files in a directory:
//! `stops.json` holds the `GetBusStopsList` result and `{nodeId}.json`
//! holds the forecast for one stop. Files are read on every call, so they
//! can be edited while the server runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::NodeId;

use super::Upstream;
use super::error::AtbError;
use super::types::{RawBusStops, RawForecasts};

/// Name of the stop list file.
const STOPS_FILE: &str = "stops.json";

/// Mock AtB client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockAtbClient {
    data_dir: PathBuf,
}

impl MockAtbClient {
    /// Create a mock client reading from `data_dir`.
    ///
    /// Fails if the directory has no `stops.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, AtbError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.join(STOPS_FILE).is_file() {
            return Err(AtbError::Mock(format!(
                "no {STOPS_FILE} in mock data directory {}",
                data_dir.display()
            )));
        }

        Ok(Self { data_dir })
    }

    /// The directory files are served from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<T, AtbError> {
        let path = self.data_dir.join(file);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AtbError::Mock(format!("failed to read {}: {e}", path.display())))?;

        serde_json::from_str(&json).map_err(|e| AtbError::Json {
            message: format!("{}: {e}", path.display()),
            body: None,
        })
    }
}

#[async_trait]
impl Upstream for MockAtbClient {
    async fn fetch_stops(&self) -> Result<RawBusStops, AtbError> {
        self.load(STOPS_FILE).await
    }

    async fn fetch_forecast(&self, node_id: NodeId) -> Result<RawForecasts, AtbError> {
        self.load(&format!("{node_id}.json")).await
    }
}
