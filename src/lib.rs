/// transitflood_service: transit station flood risk monitoring service.
///
/// # Module structure
///
/// ```text
/// transitflood_service
/// ├── model       — shared data types (RiskLevel, PrecipitationSample, TideContext, …)
/// ├── config      — risk threshold table loader (thresholds.toml)
/// ├── stations    — transit station registry (stations.toml)
/// ├── risk
/// │   ├── classifier — structure-aware multi-tier risk classification
/// │   └── predicted  — forecast totals projected through the classifier
/// ├── forecast    — 6h/24h window aggregation of gridded forecast periods
/// │   └── duration   — ISO 8601 validTime / duration subset grammar
/// ├── ingest
/// │   ├── mrms    — MRMS precipitation point queries
/// │   ├── tides   — NOAA CO-OPS water levels (MLLW)
/// │   ├── nws     — NWS gridpoint QPF forecast periods
/// │   ├── cdo     — NCEI CDO daily precipitation totals
/// │   └── fixtures (test only) — representative API response payloads
/// ├── report      — row assembly, summary counts, parallel collection
/// │   └── csv        — CSV rendering
/// └── endpoint    — HTTP API for reports and snapshots
/// ```

/// Public modules
pub mod config;
pub mod endpoint;
pub mod forecast;
pub mod ingest;
pub mod model;
pub mod report;
pub mod risk;
pub mod stations;
