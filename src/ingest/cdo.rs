/// NCEI Climate Data Online (GHCN-Daily) client.
///
/// Fetches daily precipitation totals for the three reference climate
/// stations carried on every report row: Central Park, JFK, and
/// LaGuardia. CDO requires a registered token, supplied via the
/// `CDO_TOKEN` environment variable; with no token configured the daily
/// columns simply stay empty.
///
/// API documentation: https://www.ncdc.noaa.gov/cdo-web/webservices/v2

use serde::Deserialize;

use crate::model::{DailyPrecipTotals, FetchError};

const CDO_BASE_URL: &str = "https://www.ncei.noaa.gov/cdo-web/api/v2/data";

/// GHCN-Daily station identifiers for the reference stations.
pub const GHCND_CENTRAL_PARK: &str = "GHCND:USW00094728";
pub const GHCND_JFK: &str = "GHCND:USW00094789";
pub const GHCND_LGA: &str = "GHCND:USW00014732";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CdoResponse {
    results: Option<Vec<CdoResult>>,
}

#[derive(Deserialize)]
struct CdoResult {
    /// PRCP in standard units is inches.
    value: Option<f64>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a single-station, single-day PRCP query in standard units.
pub fn build_daily_precip_url(station_id: &str, report_date: &str) -> String {
    format!(
        "{}?datasetid=GHCND&datatypeid=PRCP&stationid={}&startdate={}&enddate={}&units=standard&limit=1000",
        CDO_BASE_URL,
        urlencoding::encode(station_id),
        report_date,
        report_date
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a CDO response into a daily total in inches. An empty result set
/// is normal (the day's observation not yet published) and yields `None`.
pub fn parse_daily_precip_response(json: &str) -> Result<Option<f64>, FetchError> {
    let response: CdoResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let results = response.results.unwrap_or_default();
    Ok(results.first().and_then(|r| r.value))
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches one station's daily total. Returns `None` on any failure —
/// daily climate context is best-effort and never blocks a report.
fn fetch_station_daily_precip(
    client: &reqwest::blocking::Client,
    token: &str,
    station_id: &str,
    report_date: &str,
) -> Option<f64> {
    let url = build_daily_precip_url(station_id, report_date);

    let response = match client.get(&url).header("token", token).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Warning: CDO fetch failed for {}: {}", station_id, e);
            return None;
        }
    };

    if !response.status().is_success() {
        eprintln!(
            "Warning: CDO returned HTTP {} for {}",
            response.status().as_u16(),
            station_id
        );
        return None;
    }

    let body = response.text().ok()?;
    match parse_daily_precip_response(&body) {
        Ok(total) => total,
        Err(e) => {
            eprintln!("Warning: CDO parse failed for {}: {}", station_id, e);
            None
        }
    }
}

/// Fetches daily totals for all three reference stations. `token = None`
/// (unset `CDO_TOKEN`) skips the fetch entirely.
pub fn fetch_daily_totals(
    client: &reqwest::blocking::Client,
    token: Option<&str>,
    report_date: &str,
) -> DailyPrecipTotals {
    let Some(token) = token else {
        return DailyPrecipTotals::default();
    };

    DailyPrecipTotals {
        central_park_daily_in: fetch_station_daily_precip(
            client,
            token,
            GHCND_CENTRAL_PARK,
            report_date,
        ),
        jfk_daily_in: fetch_station_daily_precip(client, token, GHCND_JFK, report_date),
        lga_daily_in: fetch_station_daily_precip(client, token, GHCND_LGA, report_date),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
