//! AtB InfoTransit response DTOs.
//!
//! These types map directly to the JSON embedded in the SOAP responses.
//! Field names are AtB's (Italian, from the underlying MIZ system), so every
//! field carries an explicit rename.

use serde::Deserialize;

/// Response payload from `GetBusStopsList`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBusStops {
    #[serde(rename = "Fermate")]
    pub stops: Vec<RawBusStop>,
}

/// A bus stop as AtB describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBusStop {
    /// Internal station ID.
    #[serde(rename = "cinFermata")]
    pub stop_id: u32,

    /// Public node ID, as a decimal string.
    #[serde(rename = "codAzNodo")]
    pub node_id: String,

    #[serde(rename = "descrizione")]
    pub description: String,

    /// Easting-style longitude, as a decimal string.
    #[serde(rename = "lon")]
    pub longitude: String,

    /// Northing-style latitude. AtB sends this one as a number.
    #[serde(rename = "lat")]
    pub latitude: i64,

    #[serde(rename = "codeMobile")]
    pub mobile_code: String,

    #[serde(rename = "nomeMobile")]
    pub mobile_name: String,
}

/// Response payload from `getUserRealTimeForecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecasts {
    /// Stop information echoed back by the forecast call.
    #[serde(rename = "InfoNodo", default)]
    pub nodes: Vec<RawNodeInfo>,

    #[serde(rename = "Orari")]
    pub forecasts: Vec<RawForecast>,

    #[serde(default)]
    pub total: i64,
}

/// Stop information included in a forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNodeInfo {
    #[serde(rename = "nome_Az")]
    pub name: String,

    #[serde(rename = "codAzNodo")]
    pub node_id: String,

    #[serde(rename = "nomeNodo")]
    pub node_name: String,

    #[serde(rename = "descrNodo")]
    pub node_description: String,

    #[serde(rename = "bitMaskProprieta")]
    pub bit_mask_properties: String,

    #[serde(rename = "codeMobile")]
    pub mobile_code: String,

    #[serde(rename = "coordLon")]
    pub longitude: String,

    #[serde(rename = "coordLat")]
    pub latitude: String,
}

/// A single departure forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    #[serde(rename = "codAzLinea")]
    pub line_id: String,

    #[serde(rename = "descrizioneLinea")]
    pub line_description: String,

    /// Expected departure, `dd.mm.yyyy HH:MM`.
    #[serde(rename = "orario")]
    pub registered_departure_time: String,

    /// Timetabled departure, `dd.mm.yyyy HH:MM`.
    #[serde(rename = "orarioSched")]
    pub scheduled_departure_time: String,

    /// `"Prev"` when the expected time is a live prediction, `"Sched"`
    /// when it is copied from the timetable.
    #[serde(rename = "statoPrevisione")]
    pub station_forecast: String,

    #[serde(rename = "capDest")]
    pub destination: String,
}
