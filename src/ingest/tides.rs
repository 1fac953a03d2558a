/// NOAA CO-OPS tide station client.
///
/// Retrieves the latest water level readings from the harbor tide gauges
/// that gate the coastal risk amplifier. Readings are requested in english
/// units against the MLLW datum, which is the datum the threshold table's
/// tide gate is expressed in.
///
/// API documentation: https://api.tidesandcurrents.noaa.gov/api/prod/

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::model::{FetchError, TideReading};

const COOPS_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Monitored NOAA tide stations: (station id, station name).
pub const TIDE_STATIONS: &[(&str, &str)] = &[
    ("8518750", "The Battery, NY"),
    ("8516945", "Kings Point, NY"),
];

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WaterLevelResponse {
    data: Option<Vec<WaterLevelEntry>>,
}

#[derive(Deserialize)]
struct WaterLevelEntry {
    /// Timestamp, "YYYY-MM-DD HH:MM" in GMT.
    t: String,
    /// Water level as a string, feet above MLLW.
    v: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a latest-water-level URL for one tide station.
pub fn build_water_level_url(station_id: &str) -> String {
    format!(
        "{}?station={}&product=water_level&datum=MLLW&units=english&time_zone=gmt&format=json&date=latest&application=transitflood_service",
        COOPS_BASE_URL, station_id
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a CO-OPS water level response into a `TideReading`.
///
/// # Errors
/// - `FetchError::ParseError` — malformed JSON, value, or timestamp.
/// - `FetchError::NoDataAvailable` — the station returned no readings.
pub fn parse_water_level_response(
    json: &str,
    station_id: &str,
) -> Result<TideReading, FetchError> {
    let response: WaterLevelResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let entries = response.data.unwrap_or_default();
    let latest = entries
        .first()
        .ok_or_else(|| FetchError::NoDataAvailable(format!("no readings for {}", station_id)))?;

    let water_level_ft: f64 = latest
        .v
        .parse()
        .map_err(|e| FetchError::ParseError(format!("bad water level '{}': {}", latest.v, e)))?;

    // CO-OPS timestamps are GMT without an offset, e.g. "2026-01-23 14:30".
    let timestamp = NaiveDateTime::parse_from_str(&latest.t, "%Y-%m-%d %H:%M")
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .map_err(|e| FetchError::ParseError(format!("bad timestamp '{}': {}", latest.t, e)))?;

    let station_name = TIDE_STATIONS
        .iter()
        .find(|(id, _)| *id == station_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| station_id.to_string());

    Ok(TideReading {
        station_id: station_id.to_string(),
        station_name,
        water_level_ft,
        timestamp,
        datum: "MLLW".to_string(),
    })
}

/// Mean water level across the available readings. `None` when no station
/// reported — callers treat that as tide-unavailable, which disables the
/// coastal rule rather than failing the report.
pub fn current_tide_level(readings: &[TideReading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    let sum: f64 = readings.iter().map(|r| r.water_level_ft).sum();
    Some(sum / readings.len() as f64)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches the latest reading from one tide station.
pub fn fetch_reading(
    client: &reqwest::blocking::Client,
    station_id: &str,
) -> Result<TideReading, Box<dyn std::error::Error>> {
    let url = build_water_level_url(station_id);

    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(Box::new(FetchError::HttpError(response.status().as_u16())));
    }

    let body = response.text()?;
    Ok(parse_water_level_response(&body, station_id)?)
}

/// Fetches readings from every monitored tide station. Stations that fail
/// are logged and skipped; an empty result means the tide feed is down.
pub fn fetch_all_readings(client: &reqwest::blocking::Client) -> Vec<TideReading> {
    let mut readings = Vec::new();
    for (station_id, name) in TIDE_STATIONS {
        match fetch_reading(client, station_id) {
            Ok(reading) => readings.push(reading),
            Err(e) => eprintln!("Warning: tide fetch failed for {}: {}", name, e),
        }
    }
    readings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
