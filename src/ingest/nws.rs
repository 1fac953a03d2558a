/// NWS gridpoint forecast client.
///
/// Two-step retrieval: `/points/{lat},{lon}` resolves the forecast grid
/// for a coordinate, then the grid's `forecastGridData` URL serves the
/// gridded `quantitativePrecipitation` series consumed by the window
/// aggregator. Entries whose validTime fails to parse are dropped from
/// the series, but counted — a vanished period should be visible in the
/// logs, not silent.
///
/// API documentation: https://www.weather.gov/documentation/services-web-api

use serde::Deserialize;

use crate::forecast::duration::parse_valid_time;
use crate::model::{FetchError, ForecastPeriod};

const NWS_BASE_URL: &str = "https://api.weather.gov";

/// NWS requires a User-Agent identifying the application.
const USER_AGENT: &str = "transitflood_service";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Deserialize)]
struct PointsProperties {
    #[serde(rename = "forecastGridData")]
    forecast_grid_data: Option<String>,
}

#[derive(Deserialize)]
struct GridResponse {
    properties: GridProperties,
}

#[derive(Deserialize)]
struct GridProperties {
    #[serde(rename = "quantitativePrecipitation")]
    quantitative_precipitation: Option<QpfLayer>,
}

#[derive(Deserialize)]
struct QpfLayer {
    values: Vec<QpfValue>,
}

#[derive(Deserialize)]
struct QpfValue {
    #[serde(rename = "validTime")]
    valid_time: Option<String>,
    /// Precipitation quantity in millimeters. Null when the grid has no
    /// value for the period.
    value: Option<f64>,
}

/// The parsed QPF series plus a count of entries dropped because their
/// validTime (or value) was missing or unparsable.
#[derive(Debug, Clone, PartialEq)]
pub struct QpfSeries {
    pub periods: Vec<ForecastPeriod>,
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the points-metadata URL for a coordinate. NWS canonicalizes
/// coordinates to four decimal places.
pub fn build_points_url(latitude: f64, longitude: f64) -> String {
    format!("{}/points/{:.4},{:.4}", NWS_BASE_URL, latitude, longitude)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extracts the forecast grid URL from a points response.
///
/// # Errors
/// - `FetchError::ParseError` — malformed JSON.
/// - `FetchError::NoDataAvailable` — the point has no forecast grid.
pub fn parse_points_response(json: &str) -> Result<String, FetchError> {
    let response: PointsResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    response
        .properties
        .forecast_grid_data
        .ok_or_else(|| FetchError::NoDataAvailable("no forecastGridData URL".to_string()))
}

/// Parses a grid response's quantitativePrecipitation series into forecast
/// periods.
///
/// Entries with a missing validTime or value are dropped and counted.
/// Entries whose duration text fails the grammar are kept with zero hours
/// (the aggregator skips them) and also counted, so the caller can log how
/// much of the series vanished.
pub fn parse_qpf_response(json: &str) -> Result<QpfSeries, FetchError> {
    let response: GridResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let layer = response
        .properties
        .quantitative_precipitation
        .ok_or_else(|| FetchError::NoDataAvailable("no quantitativePrecipitation layer".to_string()))?;

    let mut periods = Vec::new();
    let mut dropped = 0;

    for entry in layer.values {
        let (valid_time, quantity_mm) = match (entry.valid_time, entry.value) {
            (Some(t), Some(v)) => (t, v),
            _ => {
                dropped += 1;
                continue;
            }
        };

        match parse_valid_time(&valid_time) {
            Some((start, duration_hours)) => {
                if duration_hours <= 0.0 {
                    dropped += 1;
                }
                periods.push(ForecastPeriod {
                    start,
                    duration_hours,
                    quantity_mm,
                });
            }
            None => {
                dropped += 1;
            }
        }
    }

    Ok(QpfSeries { periods, dropped })
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches the QPF forecast periods for a station location, chaining the
/// points lookup and the grid retrieval.
pub fn fetch_forecast_periods(
    client: &reqwest::blocking::Client,
    latitude: f64,
    longitude: f64,
) -> Result<Vec<ForecastPeriod>, Box<dyn std::error::Error>> {
    let points_url = build_points_url(latitude, longitude);
    let points_body = get_text(client, &points_url)?;
    let grid_url = parse_points_response(&points_body)?;

    let grid_body = get_text(client, &grid_url)?;
    let series = parse_qpf_response(&grid_body)?;

    if series.dropped > 0 {
        eprintln!(
            "Warning: {} QPF entries at {:.4},{:.4} had unusable validTime/value and were dropped",
            series.dropped, latitude, longitude
        );
    }

    Ok(series.periods)
}

fn get_text(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let response = client.get(url).header("User-Agent", USER_AGENT).send()?;
    if !response.status().is_success() {
        return Err(Box::new(FetchError::HttpError(response.status().as_u16())));
    }
    Ok(response.text()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
