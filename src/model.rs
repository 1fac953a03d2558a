/// Core data types for the transit flood risk monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond serde
/// and chrono — only types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Risk types
// ---------------------------------------------------------------------------

/// Flood risk levels, in ascending order of severity.
///
/// The wire labels match the public report vocabulary: a LOW station is
/// "CLEAR", an AT_RISK station is under a "FLOOD WATCH", and a HIGH station
/// is under a "FLOOD WARNING". Ordering is used only by report summaries;
/// the classifier always returns a single discrete level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "CLEAR")]
    Low,
    #[serde(rename = "FLOOD WATCH")]
    AtRisk,
    #[serde(rename = "FLOOD WARNING")]
    High,
}

impl RiskLevel {
    /// The report label for this level ("CLEAR", "FLOOD WATCH", "FLOOD WARNING").
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "CLEAR",
            RiskLevel::AtRisk => "FLOOD WATCH",
            RiskLevel::High => "FLOOD WARNING",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A risk verdict together with the rule that produced it.
///
/// The reason names the rule group and metric that fired, with the compared
/// numeric values at the same precision the decision used. Level and reason
/// are produced by a single evaluation pass, so they cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// An instantaneous precipitation snapshot at a station's location.
///
/// Any field may be absent when the upstream grid had no value for the
/// point; the classifier treats missing rate/accumulation as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecipitationSample {
    /// Instantaneous precipitation rate, inches per hour.
    pub rate_in_hr: Option<f64>,
    /// 1-hour accumulated precipitation, inches.
    pub accum_1hr_in: Option<f64>,
    /// 6-hour accumulated precipitation, inches.
    pub accum_6hr_in: Option<f64>,
}

/// Tide conditions applicable to a station evaluation.
///
/// `level_ft` is the current water level in feet above the MLLW datum. An
/// absent level with `is_coastal = true` disables the coastal rule for that
/// evaluation — the station is treated as non-coastal rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TideContext {
    pub is_coastal: bool,
    pub level_ft: Option<f64>,
}

impl TideContext {
    /// Non-coastal context, used for inland stations.
    pub fn inland() -> Self {
        TideContext { is_coastal: false, level_ft: None }
    }

    /// Coastal context with the given water level (None if the tide feed
    /// was unavailable).
    pub fn coastal(level_ft: Option<f64>) -> Self {
        TideContext { is_coastal: true, level_ft }
    }
}

/// A single water level measurement from a NOAA CO-OPS tide station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideReading {
    pub station_id: String,
    pub station_name: String,
    /// Water level in feet above MLLW.
    pub water_level_ft: f64,
    pub timestamp: DateTime<Utc>,
    pub datum: String, // "MLLW"
}

/// Daily precipitation totals from the NCEI CDO GHCN-Daily dataset for the
/// three reference climate stations carried on every report row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyPrecipTotals {
    pub central_park_daily_in: Option<f64>,
    pub jfk_daily_in: Option<f64>,
    pub lga_daily_in: Option<f64>,
}

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// One gridded forecast period from the NWS quantitativePrecipitation
/// series.
///
/// Periods arrive in no guaranteed order and may overlap or leave gaps.
/// `duration_hours` is zero when the source validTime duration could not
/// be parsed; such periods contribute nothing to windowed totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPeriod {
    pub start: DateTime<Utc>,
    pub duration_hours: f64,
    pub quantity_mm: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing upstream weather data.
#[derive(Debug, PartialEq)]
pub enum FetchError {
    /// Non-2xx HTTP response from an upstream API.
    HttpError(u16),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The response parsed but contained no usable values.
    NoDataAvailable(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FetchError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FetchError::NoDataAvailable(msg) => write!(f, "No data available: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
