//! Conversion from AtB DTOs to domain types.
//!
//! A malformed record means the payload cannot be trusted, so any failed
//! conversion fails the whole response.

use chrono::NaiveDateTime;

use crate::domain::{BusStop, BusStops, Departure, Departures, NodeId};

use super::types::{RawBusStop, RawBusStops, RawForecast, RawForecasts};

/// Timestamp format used by AtB forecasts, e.g. `26.02.2015 22:55`.
const ATB_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Forecast state meaning the expected time comes from vehicle tracking.
const REALTIME_STATE: &str = "Prev";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Node ID is not a decimal number
    #[error("invalid node ID: {0:?}")]
    InvalidNodeId(String),

    /// Coordinate is not a number
    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    /// Failed to parse a time string
    #[error("invalid time: {0:?}")]
    InvalidTime(String),
}

/// Convert the stop list and build its node ID index.
pub fn convert_bus_stops(raw: RawBusStops) -> Result<BusStops, ConversionError> {
    let stops = raw
        .stops
        .into_iter()
        .map(convert_bus_stop)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BusStops::new(stops))
}

/// Convert a single stop.
pub fn convert_bus_stop(raw: RawBusStop) -> Result<BusStop, ConversionError> {
    let node_id = parse_node_id(&raw.node_id)?;

    let longitude = raw
        .longitude
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConversionError::InvalidCoordinate(raw.longitude.clone()))?;

    Ok(BusStop {
        stop_id: raw.stop_id,
        node_id,
        description: raw.description,
        longitude,
        latitude: raw.latitude as f64,
        mobile_code: raw.mobile_code,
        mobile_name: raw.mobile_name,
    })
}

/// Convert a forecast response for the stop `node_id`.
pub fn convert_forecasts(
    node_id: NodeId,
    raw: RawForecasts,
) -> Result<Departures, ConversionError> {
    let departures = raw
        .forecasts
        .iter()
        .map(convert_forecast)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Departures {
        towards_centrum: node_id.is_towards_centrum(),
        departures,
    })
}

/// Convert a single forecast row.
pub fn convert_forecast(raw: &RawForecast) -> Result<Departure, ConversionError> {
    Ok(Departure {
        line_id: raw.line_id.clone(),
        registered_departure_time: parse_atb_time(&raw.registered_departure_time)?,
        scheduled_departure_time: parse_atb_time(&raw.scheduled_departure_time)?,
        destination: raw.destination.clone(),
        is_realtime_data: raw.station_forecast == REALTIME_STATE,
    })
}

fn parse_node_id(s: &str) -> Result<NodeId, ConversionError> {
    NodeId::parse(s.trim()).map_err(|_| ConversionError::InvalidNodeId(s.to_string()))
}

fn parse_atb_time(s: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(s.trim(), ATB_TIME_FORMAT)
        .map_err(|_| ConversionError::InvalidTime(s.to_string()))
}
