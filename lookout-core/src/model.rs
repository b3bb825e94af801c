//! Response shapes for the three upstream services.
//!
//! Every struct decodes with `#[serde(default)]`, so keys missing from a body
//! leave the field at its zero value instead of failing the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookoutError;

/// OpenWeather "current weather" payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherInfo {
    pub coord: Coord,
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,
    pub base: String,
    #[serde(rename = "main")]
    pub atmosphere: Atmosphere,
    pub visibility: i64,
    pub wind: Wind,
    pub clouds: Clouds,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub dt: i64,
    pub sys: Sys,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    pub cod: i64,
}

impl WeatherInfo {
    /// First condition entry; upstream lists the primary one first.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atmosphere {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub sea_level: Option<f64>,
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clouds {
    pub all: f64,
}

/// Rain or snow volume in millimetres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub last_1h: Option<f64>,
    #[serde(rename = "3h")]
    pub last_3h: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub id: Option<i64>,
    /// Absent over open water.
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

impl Sys {
    pub fn sunrise_utc(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunrise)
    }

    pub fn sunset_utc(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunset)
    }
}

pub fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Open Notify "iss-now" payload. Coordinates arrive as JSON strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssLocation {
    pub message: String,
    pub timestamp: i64,
    pub iss_position: IssPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssPosition {
    pub latitude: String,
    pub longitude: String,
}

impl IssLocation {
    /// Server time of the position fix.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.timestamp)
    }

    /// Parse the string coordinates into a validated pair.
    pub fn coordinates(&self) -> Result<Coordinates, LookoutError> {
        let parse = |label: &str, raw: &str| {
            raw.trim().parse::<f64>().map_err(|_| {
                LookoutError::Decode(format!("ISS {label} is not a number: '{raw}'"))
            })
        };

        let lat = parse("latitude", &self.iss_position.latitude)?;
        let lon = parse("longitude", &self.iss_position.longitude)?;

        Coordinates::new(lat, lon).map_err(|e| LookoutError::Decode(e.to_string()))
    }
}

/// CoinAPI asset entry. The endpoint wraps it in a one-element array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoAsset {
    pub asset_id: String,
    pub name: String,
    /// `None` when CoinAPI has no USD quote for the asset.
    pub price_usd: Option<f64>,
}

/// Latitude/longitude pair inside the valid geographic ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, LookoutError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LookoutError::InputFormat(
                "Latitude must be between -90 and 90.".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(LookoutError::InputFormat(
                "Longitude must be between -180 and 180.".to_string(),
            ));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}
