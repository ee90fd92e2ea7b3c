//! Forecasted departures from a bus stop.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Departures from a single stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departures {
    /// Whether buses from this stop head towards the city centre.
    #[serde(rename = "isGoingTowardsCentrum")]
    pub towards_centrum: bool,

    pub departures: Vec<Departure>,
}

/// A single forecasted departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Line number, e.g. "5" or "36".
    #[serde(rename = "line")]
    pub line_id: String,

    /// Expected departure time, real-time if available.
    #[serde(with = "departure_time")]
    pub registered_departure_time: NaiveDateTime,

    /// Timetabled departure time.
    #[serde(with = "departure_time")]
    pub scheduled_departure_time: NaiveDateTime,

    pub destination: String,

    /// Whether `registered_departure_time` comes from live vehicle tracking.
    pub is_realtime_data: bool,
}

/// Serialize departure times as `2015-02-26T22:55:00.000`.
mod departure_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
