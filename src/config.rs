/// Risk threshold configuration loader - parses thresholds.toml
///
/// Separates the numeric cutoff table from code, making it easy to tune
/// thresholds per structure class without recompiling the service. Unlike
/// the station registry, the threshold file is optional: when absent, the
/// operational defaults below apply.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Per-structure-class risk cutoffs, in inches/hour for rates, inches for
/// 6-hour accumulations, and feet (MLLW) for the tide gate.
///
/// Convention: every `atrisk` value sits at or below its paired `high`
/// value. The classifier does not enforce this — an inverted pair yields
/// contradictory but well-defined verdicts, not an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    // Underground stations (most vulnerable to runoff)
    pub subway_atrisk_precip_rate: f64,
    pub subway_high_precip_rate: f64,
    pub subway_atrisk_accum_6hr: f64,
    pub subway_high_accum_6hr: f64,

    // Open cut stations
    pub opencut_atrisk_precip_rate: f64,
    pub opencut_high_precip_rate: f64,
    pub opencut_atrisk_accum_6hr: f64,
    pub opencut_high_accum_6hr: f64,

    // Coastal amplifier: only consulted when the tide level exceeds the gate
    pub tide_high_level: f64,
    pub coastal_atrisk_precip_rate: f64,
    pub coastal_high_precip_rate: f64,

    // Elevated stations (safest from flooding)
    pub elevated_atrisk_precip_rate: f64,

    // At-grade and everything else
    pub default_atrisk_precip_rate: f64,
    pub default_high_precip_rate: f64,
    pub default_atrisk_accum_6hr: f64,
    pub default_high_accum_6hr: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            subway_atrisk_precip_rate: 0.20,
            subway_high_precip_rate: 0.50,
            subway_atrisk_accum_6hr: 1.0,
            subway_high_accum_6hr: 2.0,

            opencut_atrisk_precip_rate: 0.25,
            opencut_high_precip_rate: 0.60,
            opencut_atrisk_accum_6hr: 1.25,
            opencut_high_accum_6hr: 2.5,

            tide_high_level: 4.0,
            coastal_atrisk_precip_rate: 0.10,
            coastal_high_precip_rate: 0.25,

            elevated_atrisk_precip_rate: 0.30,

            default_atrisk_precip_rate: 0.15,
            default_high_precip_rate: 0.40,
            default_atrisk_accum_6hr: 0.75,
            default_high_accum_6hr: 1.50,
        }
    }
}

/// Loads the threshold table from `thresholds.toml` in the working
/// directory, falling back to the built-in defaults when the file does
/// not exist. Fields omitted from the file keep their default values.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed — the service
/// must not run against a half-applied threshold table.
pub fn load_thresholds() -> RiskThresholds {
    load_thresholds_from(Path::new("thresholds.toml"))
}

/// Loads the threshold table from an explicit path (testing seam).
pub fn load_thresholds_from(path: &Path) -> RiskThresholds {
    if !path.exists() {
        return RiskThresholds::default();
    }

    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_operational_table() {
        let t = RiskThresholds::default();
        assert_eq!(t.subway_atrisk_precip_rate, 0.20);
        assert_eq!(t.subway_high_precip_rate, 0.50);
        assert_eq!(t.subway_atrisk_accum_6hr, 1.0);
        assert_eq!(t.subway_high_accum_6hr, 2.0);
        assert_eq!(t.elevated_atrisk_precip_rate, 0.30);
        assert_eq!(t.tide_high_level, 4.0);
        assert_eq!(t.coastal_atrisk_precip_rate, 0.10);
        assert_eq!(t.coastal_high_precip_rate, 0.25);
        assert_eq!(t.default_atrisk_precip_rate, 0.15);
        assert_eq!(t.default_high_precip_rate, 0.40);
        assert_eq!(t.default_atrisk_accum_6hr, 0.75);
        assert_eq!(t.default_high_accum_6hr, 1.50);
    }

    #[test]
    fn test_atrisk_values_do_not_exceed_high_values() {
        // The classifier tolerates inverted pairs, but the shipped defaults
        // must honor the atrisk <= high convention.
        let t = RiskThresholds::default();
        assert!(t.subway_atrisk_precip_rate <= t.subway_high_precip_rate);
        assert!(t.subway_atrisk_accum_6hr <= t.subway_high_accum_6hr);
        assert!(t.opencut_atrisk_precip_rate <= t.opencut_high_precip_rate);
        assert!(t.opencut_atrisk_accum_6hr <= t.opencut_high_accum_6hr);
        assert!(t.coastal_atrisk_precip_rate <= t.coastal_high_precip_rate);
        assert!(t.default_atrisk_precip_rate <= t.default_high_precip_rate);
        assert!(t.default_atrisk_accum_6hr <= t.default_high_accum_6hr);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let loaded = load_thresholds_from(Path::new("does-not-exist.toml"));
        assert_eq!(loaded, RiskThresholds::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_omitted_fields() {
        let partial: RiskThresholds =
            toml::from_str("subway_high_precip_rate = 0.75").expect("partial table should parse");
        assert_eq!(partial.subway_high_precip_rate, 0.75);
        // Everything else keeps its default.
        assert_eq!(partial.subway_atrisk_precip_rate, 0.20);
        assert_eq!(partial.default_high_accum_6hr, 1.50);
    }
}
