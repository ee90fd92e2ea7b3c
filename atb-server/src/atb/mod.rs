//! AtB InfoTransit client.
//!
//! This module provides a client for AtB's InfoTransit service, which
//! publishes Trondheim bus stops and real-time departure forecasts.
//!
//! Key characteristics of InfoTransit:
//! - It is a SOAP 1.2 service, but results are JSON documents embedded as
//!   escaped text inside the SOAP response
//! - Field names are Italian (`Fermate`, `codAzNodo`, `orario`, ...)
//! - It is slow; the stop list in particular takes seconds to fetch

mod client;
mod convert;
mod error;
mod mock;
mod soap;
mod types;

use async_trait::async_trait;

use crate::domain::NodeId;

pub use client::{AtbClient, AtbConfig, DEFAULT_URL};
pub use convert::{ConversionError, convert_bus_stops, convert_forecasts};
pub use error::AtbError;
pub use mock::MockAtbClient;
pub use types::{RawBusStop, RawBusStops, RawForecast, RawForecasts, RawNodeInfo};

/// Source of raw stop and forecast data.
///
/// Implemented by the real [`AtbClient`] and the file-backed
/// [`MockAtbClient`]; tests provide their own.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// Fetch the full stop list.
    async fn fetch_stops(&self) -> Result<RawBusStops, AtbError>;

    /// Fetch the departure forecast for one stop.
    async fn fetch_forecast(&self, node_id: NodeId) -> Result<RawForecasts, AtbError>;
}
