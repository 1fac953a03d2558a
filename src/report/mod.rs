/// Report assembly for the transit flood monitoring service.
///
/// Builds per-station report rows from pre-fetched observations, applies
/// the risk engine (observed + predicted), and produces the summary
/// counts consumed by the JSON endpoint and the CSV renderer. Row
/// assembly is pure; the only I/O here is `collect_observations`, which
/// fans per-station fetches out on a thread pool.
///
/// Submodules:
/// - `csv` — CSV rendering of assembled reports.

pub mod csv;

use std::collections::HashMap;
use std::sync::mpsc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use threadpool::ThreadPool;

use crate::config::RiskThresholds;
use crate::forecast::{aggregate_windows, WindowTotals};
use crate::ingest::{mrms, nws};
use crate::model::{DailyPrecipTotals, FetchError, PrecipitationSample, RiskLevel, TideContext};
use crate::risk::{classify, project_predicted_risk};
use crate::stations::{filter_by_borough, full_borough_name, StationConfig};

/// Data source attribution carried on every report row.
pub const REPORT_SOURCE: &str = "NOAA MRMS; NOAA CDO; NWS";

/// Worker threads for per-station data collection.
const COLLECTION_THREADS: usize = 8;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One station's row in the flood risk report.
#[derive(Debug, Clone, Serialize)]
pub struct StationReport {
    pub station_id: String,
    pub station_name: String,
    pub borough: String,
    pub line: Option<String>,
    pub daytime_routes: Option<String>,
    pub structure: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_coastal: bool,
    pub precip_rate_in_hr: Option<f64>,
    pub accum_1hr_in: Option<f64>,
    pub accum_6hr_in: Option<f64>,
    /// Present only for coastal stations with a live tide feed.
    pub tide_level_ft: Option<f64>,
    pub central_park_daily_in: Option<f64>,
    pub jfk_daily_in: Option<f64>,
    pub lga_daily_in: Option<f64>,
    pub forecast_6hr_in: Option<f64>,
    pub forecast_24hr_in: Option<f64>,
    pub predicted_risk_6hr: Option<RiskLevel>,
    pub predicted_risk_24hr: Option<RiskLevel>,
    pub risk_level: RiskLevel,
    pub risk_reason: String,
    pub source: String,
}

/// The full report envelope returned by `/api/report`.
#[derive(Debug, Clone, Serialize)]
pub struct FullReport {
    pub generated_at: DateTime<Utc>,
    pub report_date: String,
    pub source: String,
    pub station_count: usize,
    pub high_risk_count: usize,
    pub at_risk_count: usize,
    pub stations: Vec<StationReport>,
}

/// Counts of stations per risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
    pub high_risk_count: usize,
    pub at_risk_count: usize,
    pub low_count: usize,
    pub total: usize,
}

/// Everything fetched per station before assembly.
#[derive(Debug, Clone, Default)]
pub struct StationObservations {
    pub sample: PrecipitationSample,
    /// Windowed forecast totals; `None` when the forecast fetch or
    /// aggregation failed for this station.
    pub forecast: Option<WindowTotals>,
}

// ---------------------------------------------------------------------------
// Row assembly
// ---------------------------------------------------------------------------

/// Builds one station's report row.
///
/// The tide level participates in classification (and appears on the row)
/// only for coastal stations; an absent level leaves the coastal rule
/// disabled. Absent forecast totals leave the predicted columns empty
/// rather than defaulting them to CLEAR.
pub fn build_station_report(
    station: &StationConfig,
    observations: &StationObservations,
    tide_level_ft: Option<f64>,
    daily: &DailyPrecipTotals,
    thresholds: &RiskThresholds,
) -> StationReport {
    let tide = if station.is_coastal {
        TideContext::coastal(tide_level_ft)
    } else {
        TideContext::inland()
    };

    let assessment = classify(&station.structure, &observations.sample, &tide, thresholds);

    let (forecast_6hr_in, forecast_24hr_in) = match observations.forecast {
        Some(totals) => (Some(totals.total_6hr_in), Some(totals.total_24hr_in)),
        None => (None, None),
    };

    let (predicted_6hr, predicted_24hr) = project_predicted_risk(
        &station.structure,
        forecast_6hr_in,
        forecast_24hr_in,
        &tide,
        thresholds,
    );

    StationReport {
        station_id: station.station_id.clone(),
        station_name: station.name.clone(),
        borough: full_borough_name(&station.borough).to_string(),
        line: station.line.clone(),
        daytime_routes: station.daytime_routes.clone(),
        structure: station.structure.clone(),
        latitude: station.latitude,
        longitude: station.longitude,
        is_coastal: station.is_coastal,
        precip_rate_in_hr: observations.sample.rate_in_hr.map(round4),
        accum_1hr_in: observations.sample.accum_1hr_in.map(round4),
        accum_6hr_in: observations.sample.accum_6hr_in.map(round4),
        tide_level_ft: if station.is_coastal { tide_level_ft.map(round2) } else { None },
        central_park_daily_in: daily.central_park_daily_in,
        jfk_daily_in: daily.jfk_daily_in,
        lga_daily_in: daily.lga_daily_in,
        forecast_6hr_in: forecast_6hr_in.map(round4),
        forecast_24hr_in: forecast_24hr_in.map(round4),
        predicted_risk_6hr: predicted_6hr.map(|a| a.level),
        predicted_risk_24hr: predicted_24hr.map(|a| a.level),
        risk_level: assessment.level,
        risk_reason: assessment.reason,
        source: REPORT_SOURCE.to_string(),
    }
}

/// Wraps assembled rows in the report envelope with summary counts.
pub fn build_full_report(
    stations: Vec<StationReport>,
    report_date: String,
    generated_at: DateTime<Utc>,
) -> FullReport {
    let summary = summarize(stations.iter().map(|s| s.risk_level));
    FullReport {
        generated_at,
        report_date,
        source: REPORT_SOURCE.to_string(),
        station_count: stations.len(),
        high_risk_count: summary.high_risk_count,
        at_risk_count: summary.at_risk_count,
        stations,
    }
}

/// Counts risk levels for summary reporting.
pub fn summarize(levels: impl Iterator<Item = RiskLevel>) -> RiskSummary {
    let mut summary = RiskSummary { high_risk_count: 0, at_risk_count: 0, low_count: 0, total: 0 };
    for level in levels {
        summary.total += 1;
        match level {
            RiskLevel::High => summary.high_risk_count += 1,
            RiskLevel::AtRisk => summary.at_risk_count += 1,
            RiskLevel::Low => summary.low_count += 1,
        }
    }
    summary
}

/// Drops CLEAR rows, keeping only stations under a watch or warning.
pub fn filter_risk_only(stations: Vec<StationReport>) -> Vec<StationReport> {
    stations
        .into_iter()
        .filter(|s| s.risk_level > RiskLevel::Low)
        .collect()
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Report generation
// ---------------------------------------------------------------------------

/// Options for a report run.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Borough abbreviation filter (M, Bk, Q, Bx, SI).
    pub borough: Option<String>,
    /// Keep only stations under a watch or warning.
    pub risk_only: bool,
    /// Fetch NWS forecasts and project predicted risk (slower).
    pub include_forecast: bool,
}

/// Fetches everything and assembles the full report at `now`.
///
/// Shared by the HTTP endpoint and the one-shot CLI mode. Tide and daily
/// climate fetches are best-effort; only a total precipitation outage is
/// an error.
pub fn generate_report(
    client: &reqwest::blocking::Client,
    stations: &[StationConfig],
    thresholds: &RiskThresholds,
    cdo_token: Option<&str>,
    options: &ReportOptions,
    now: DateTime<Utc>,
) -> Result<FullReport, FetchError> {
    let selected: Vec<StationConfig> = match &options.borough {
        Some(borough) => filter_by_borough(stations, borough)
            .into_iter()
            .cloned()
            .collect(),
        None => stations.to_vec(),
    };

    let observations = collect_observations(client, &selected, options.include_forecast, now)?;

    let tide_readings = crate::ingest::tides::fetch_all_readings(client);
    let tide_level = crate::ingest::tides::current_tide_level(&tide_readings);

    let report_date = now.format("%Y-%m-%d").to_string();
    let daily = crate::ingest::cdo::fetch_daily_totals(client, cdo_token, &report_date);

    let mut rows: Vec<StationReport> = selected
        .iter()
        .map(|station| {
            let obs = observations
                .get(&station.station_id)
                .cloned()
                .unwrap_or_default();
            build_station_report(station, &obs, tide_level, &daily, thresholds)
        })
        .collect();

    if options.risk_only {
        rows = filter_risk_only(rows);
    }

    Ok(build_full_report(rows, report_date, now))
}

// ---------------------------------------------------------------------------
// Parallel collection
// ---------------------------------------------------------------------------

/// Fetches per-station observations (MRMS sample, and optionally the NWS
/// forecast aggregated at `now`) in parallel across a thread pool.
///
/// Individual station failures degrade: a failed sample fetch logs a
/// warning and yields an empty sample, a failed forecast fetch leaves the
/// predicted columns empty. Only a total sample outage (every station
/// failing) is reported as an error, so callers surface "data
/// unavailable" instead of a report full of fabricated CLEAR rows.
pub fn collect_observations(
    client: &reqwest::blocking::Client,
    stations: &[StationConfig],
    include_forecast: bool,
    now: DateTime<Utc>,
) -> Result<HashMap<String, StationObservations>, FetchError> {
    if stations.is_empty() {
        return Ok(HashMap::new());
    }

    let pool = ThreadPool::new(COLLECTION_THREADS.min(stations.len()));
    let (tx, rx) = mpsc::channel();

    for station in stations {
        let tx = tx.clone();
        let client = client.clone();
        let station_id = station.station_id.clone();
        let name = station.name.clone();
        let (latitude, longitude) = (station.latitude, station.longitude);

        pool.execute(move || {
            let sample = match mrms::fetch_sample(&client, latitude, longitude) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    eprintln!("Warning: precipitation fetch failed for {}: {}", name, e);
                    None
                }
            };

            let forecast = if include_forecast {
                match nws::fetch_forecast_periods(&client, latitude, longitude) {
                    Ok(periods) => Some(aggregate_windows(&periods, now)),
                    Err(e) => {
                        eprintln!("Warning: forecast fetch failed for {}: {}", name, e);
                        None
                    }
                }
            } else {
                None
            };

            let _ = tx.send((station_id, sample, forecast));
        });
    }
    drop(tx);

    let mut observations = HashMap::new();
    let mut sample_failures = 0;
    for (station_id, sample, forecast) in rx {
        if sample.is_none() {
            sample_failures += 1;
        }
        observations.insert(
            station_id,
            StationObservations { sample: sample.unwrap_or_default(), forecast },
        );
    }

    if sample_failures == stations.len() {
        return Err(FetchError::NoDataAvailable(
            "precipitation data unavailable for every station".to_string(),
        ));
    }

    Ok(observations)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
