use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProxyError;

// Request-scoped lookup value, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightQuery {
    // Airline flight number, e.g. "LH441"
    Iata(String),
    // 24-bit transponder address in hex, lower-cased for OpenSky
    Icao24(String),
}

impl FlightQuery {
    pub const IATA_PARAM: &'static str = "flight_iata";
    pub const ICAO24_PARAM: &'static str = "icao24";

    pub fn iata_from(params: &HashMap<String, String>) -> Result<Self, ProxyError> {
        required(params, Self::IATA_PARAM).map(|code| Self::Iata(code.to_string()))
    }

    pub fn icao24_from(params: &HashMap<String, String>) -> Result<Self, ProxyError> {
        required(params, Self::ICAO24_PARAM).map(|code| Self::Icao24(code.to_ascii_lowercase()))
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Iata(code) | Self::Icao24(code) => code,
        }
    }
}

// An empty value counts as missing
fn required<'a>(params: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str, ProxyError> {
    params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(ProxyError::MissingParameter(name))
}

// OpenSky /states/all response
#[derive(Deserialize, Debug, Default)]
pub struct StatesResponse {
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub states: Option<Vec<Vec<Value>>>,
}

/// One aircraft state vector. OpenSky sends these as positional arrays;
/// the field order below follows its documented column order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StateVector {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: Option<String>,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub velocity: Option<f64>,
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
}

impl StateVector {
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let text = |i: usize| row.get(i).and_then(Value::as_str).map(|s| s.trim().to_string());
        let float = |i: usize| row.get(i).and_then(Value::as_f64);
        let int = |i: usize| row.get(i).and_then(Value::as_i64);

        Some(Self {
            icao24: text(0).filter(|s| !s.is_empty())?,
            callsign: text(1).filter(|s| !s.is_empty()),
            origin_country: text(2),
            time_position: int(3),
            last_contact: int(4),
            longitude: float(5),
            latitude: float(6),
            baro_altitude: float(7),
            on_ground: row.get(8).and_then(Value::as_bool),
            velocity: float(9),
            true_track: float(10),
            vertical_rate: float(11),
            // column 12 is the sensor id list, unused here
            geo_altitude: float(13),
            squawk: text(14),
        })
    }
}

impl StatesResponse {
    pub fn first_state(&self) -> Option<StateVector> {
        self.states
            .as_ref()?
            .iter()
            .find_map(|row| StateVector::from_row(row))
    }
}

// Envelope of the live position endpoint
#[derive(Serialize, Deserialize, Debug)]
pub struct LiveEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StateVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LiveEnvelope {
    pub fn ok(data: StateVector) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

// What the browser side works with after normalization
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LivePosition {
    pub icao24: String,
    pub callsign: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    // km/h
    pub speed_horizontal: Option<i64>,
    pub heading: Option<f64>,
}

/// m/s to km/h, rounded to the nearest integer.
pub fn ms_to_kmh(velocity: f64) -> i64 {
    (velocity * 3.6).round() as i64
}

impl From<StateVector> for LivePosition {
    fn from(state: StateVector) -> Self {
        Self {
            icao24: state.icao24,
            callsign: state.callsign,
            longitude: state.longitude,
            latitude: state.latitude,
            altitude: state.baro_altitude,
            // zero counts as no reading
            speed_horizontal: state.velocity.filter(|v| *v != 0.0).map(ms_to_kmh),
            heading: state.true_track,
        }
    }
}
