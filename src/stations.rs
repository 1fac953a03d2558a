/// Transit station registry loader - parses stations.toml
///
/// Defines the canonical list of transit stations evaluated by this
/// service, along with the metadata the risk engine dispatches on: the
/// free-text structure description, coordinates for grid lookups, and the
/// coastal flood zone flag. This is the single source of truth for station
/// metadata — other modules should reference stations from here rather
/// than hardcoding names.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Borough abbreviations accepted by report filters, as they appear in the
/// station registry.
pub const VALID_BOROUGHS: &[&str] = &["M", "Bk", "Q", "Bx", "SI"];

/// Station metadata loaded from the stations.toml configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub station_id: String,
    pub name: String,

    /// Borough abbreviation: M, Bk, Q, Bx, or SI.
    pub borough: String,

    /// Line and service metadata carried through to reports.
    pub line: Option<String>,
    pub daytime_routes: Option<String>,

    /// Free-text structure description (e.g. "Subway", "Elevated",
    /// "Open Cut", "At Grade", "Embankment"). The classifier dispatches on
    /// case-insensitive substring matches against this text.
    pub structure: String,

    // Geographic location (WGS84), used for precipitation and forecast
    // grid point queries.
    pub latitude: f64,
    pub longitude: f64,

    /// Whether the station sits in a coastal flood zone and should be
    /// evaluated against the tide amplifier.
    #[serde(default)]
    pub is_coastal: bool,
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Deserialize)]
struct StationRegistry {
    station: Vec<StationConfig>,
}

/// Loads the station registry from the stations.toml configuration file.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the service cannot operate without
/// valid station metadata.
///
/// # File Location
/// Expects `stations.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_stations() -> Vec<StationConfig> {
    let config_path = "stations.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    let registry: StationRegistry = toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e));

    registry.station
}

/// Loads the station registry and builds a lookup map keyed by station id.
pub fn load_station_map() -> HashMap<String, StationConfig> {
    load_stations()
        .into_iter()
        .map(|s| (s.station_id.clone(), s))
        .collect()
}

/// Case-insensitive station lookup by name. Returns `None` if not found.
pub fn find_station_by_name<'a>(
    stations: &'a [StationConfig],
    name: &str,
) -> Option<&'a StationConfig> {
    stations
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Filters stations to a borough abbreviation. An unknown abbreviation
/// yields an empty list rather than an error; callers validate against
/// `VALID_BOROUGHS` before filtering.
pub fn filter_by_borough<'a>(
    stations: &'a [StationConfig],
    borough: &str,
) -> Vec<&'a StationConfig> {
    stations.iter().filter(|s| s.borough == borough).collect()
}

/// Expands a borough abbreviation to its full name for report output.
/// Unknown abbreviations pass through unchanged.
pub fn full_borough_name(abbrev: &str) -> &str {
    match abbrev {
        "M" => "Manhattan",
        "Bk" => "Brooklyn",
        "Q" => "Queens",
        "Bx" => "Bronx",
        "SI" => "Staten Island",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_stations_succeeds() {
        let stations = load_stations();
        assert!(stations.len() >= 12, "Should have at least 12 stations");
    }

    #[test]
    fn test_all_stations_have_required_fields() {
        for station in load_stations() {
            assert!(!station.station_id.is_empty(), "Station id must not be empty");
            assert!(!station.name.is_empty(), "Name must not be empty");
            assert!(!station.structure.is_empty(), "Structure must not be empty");
            assert!(
                VALID_BOROUGHS.contains(&station.borough.as_str()),
                "{}: borough '{}' is not a known abbreviation",
                station.name,
                station.borough
            );
            assert!(station.latitude >= -90.0 && station.latitude <= 90.0);
            assert!(station.longitude >= -180.0 && station.longitude <= 180.0);
        }
    }

    #[test]
    fn test_no_duplicate_station_ids() {
        let mut seen = std::collections::HashSet::new();
        for station in load_stations() {
            assert!(
                seen.insert(station.station_id.clone()),
                "duplicate station id '{}' found in stations.toml",
                station.station_id
            );
        }
    }

    #[test]
    fn test_registry_covers_every_structure_class() {
        // The classifier has distinct rule groups for subway, open cut, and
        // elevated structures plus the default group; the shipped registry
        // must exercise all four.
        let stations = load_stations();
        let has = |needle: &str| {
            stations
                .iter()
                .any(|s| s.structure.to_lowercase().contains(needle))
        };
        assert!(has("subway"), "registry should include a subway station");
        assert!(has("open cut"), "registry should include an open cut station");
        assert!(has("elevated"), "registry should include an elevated station");
        assert!(
            stations.iter().any(|s| {
                let lower = s.structure.to_lowercase();
                !lower.contains("subway")
                    && !lower.contains("open cut")
                    && !lower.contains("elevated")
            }),
            "registry should include a default-class station"
        );
    }

    #[test]
    fn test_registry_includes_coastal_stations() {
        let stations = load_stations();
        assert!(
            stations.iter().any(|s| s.is_coastal),
            "registry should flag at least one coastal flood zone station"
        );
    }

    #[test]
    fn test_find_station_by_name_is_case_insensitive() {
        let stations = load_stations();
        let first = &stations[0];
        let found = find_station_by_name(&stations, &first.name.to_uppercase())
            .expect("uppercase lookup should find the station");
        assert_eq!(found.station_id, first.station_id);
    }

    #[test]
    fn test_find_station_by_name_returns_none_for_unknown() {
        let stations = load_stations();
        assert!(find_station_by_name(&stations, "No Such Station").is_none());
    }

    #[test]
    fn test_borough_expansion() {
        assert_eq!(full_borough_name("M"), "Manhattan");
        assert_eq!(full_borough_name("Bk"), "Brooklyn");
        assert_eq!(full_borough_name("Q"), "Queens");
        assert_eq!(full_borough_name("Bx"), "Bronx");
        assert_eq!(full_borough_name("SI"), "Staten Island");
        assert_eq!(full_borough_name("??"), "??");
    }

    #[test]
    fn test_station_map_lookup() {
        let map = load_station_map();
        let stations = load_stations();
        assert_eq!(map.len(), stations.len());
        for station in &stations {
            assert!(map.contains_key(&station.station_id));
        }
    }
}
