/// Upstream data source clients.
///
/// Each data source gets its own file: URL construction and response
/// parsing are kept separate from the HTTP call so the parsers can be
/// exercised against fixtures without a network.
///
/// Submodules:
/// - `mrms`     — MRMS precipitation point queries (rate + accumulations)
/// - `tides`    — NOAA CO-OPS water level readings (MLLW datum)
/// - `nws`      — NWS gridpoint QPF forecast periods
/// - `cdo`      — NCEI CDO GHCN-Daily precipitation totals
/// - `fixtures` (test only) — representative API response payloads

pub mod cdo;
pub mod mrms;
pub mod nws;
pub mod tides;

#[cfg(test)]
pub mod fixtures;
