/// Structure-aware flood risk classification.
///
/// A station's verdict comes from an ordered sequence of rule groups
/// dispatched on its free-text structure description:
///
///   1. Underground ("subway")  — rate/accumulation tiers, falls through
///   2. Open cut ("open cut")   — rate/accumulation tiers, falls through
///   3. Coastal amplifier       — rate tiers gated on tide level, falls through
///   4. Elevated ("elevated")   — single rate tier, terminal
///   5. Default                 — rate/accumulation tiers, catch-all
///
/// Groups 1-3 only conclude when one of their own cutoffs is exceeded; a
/// topically matched group whose conditions are all below threshold defers
/// to the next group rather than concluding LOW. The elevated group is the
/// exception: once matched it always concludes, returning LOW when the
/// rate is below its cutoff. Each evaluator returns `Option<RiskAssessment>`
/// and the driver stops at the first `Some`, so the level and its reason
/// string come from one decision point and cannot disagree.
///
/// No input is rejected: missing sample fields read as zero, an absent
/// tide level disables the coastal group, and an empty structure string
/// lands in the default group.

use crate::config::RiskThresholds;
use crate::model::{PrecipitationSample, RiskAssessment, RiskLevel, TideContext};

// ---------------------------------------------------------------------------
// Rule context
// ---------------------------------------------------------------------------

/// Everything a rule group needs to evaluate one station snapshot.
///
/// Observed and forecast-projected evaluations share the same groups;
/// forecast evaluations scale accumulation cutoffs by `accum_scale`
/// (window hours / 6) and relabel the metrics for reason strings.
struct RuleContext<'a> {
    structure_lower: String,
    rate: f64,
    accum: f64,
    accum_scale: f64,
    rate_label: &'a str,
    accum_label: String,
    tide: TideContext,
    thresholds: &'a RiskThresholds,
}

/// One rule group. Returns `Some` to conclude the evaluation, `None` to
/// defer to the next group.
type RuleGroup = fn(&RuleContext) -> Option<RiskAssessment>;

/// Group order is load-bearing: underground and open cut take precedence
/// over the coastal amplifier, which takes precedence over elevated.
const RULE_GROUPS: &[RuleGroup] = &[underground, open_cut, coastal, elevated];

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Classifies an observed precipitation/tide snapshot for a station.
///
/// Missing sample fields degrade to zero; classification never fails.
pub fn classify(
    structure: &str,
    sample: &PrecipitationSample,
    tide: &TideContext,
    thresholds: &RiskThresholds,
) -> RiskAssessment {
    let ctx = RuleContext {
        structure_lower: structure.to_lowercase(),
        rate: sample.rate_in_hr.unwrap_or(0.0),
        accum: sample.accum_6hr_in.unwrap_or(0.0),
        accum_scale: 1.0,
        rate_label: "precip rate",
        accum_label: "6hr accumulation".to_string(),
        tide: *tide,
        thresholds,
    };
    run_rule_groups(&ctx)
}

/// Classifies forecast-projected conditions over a future window.
///
/// Applies the identical rule sequence as [`classify`], substituting the
/// average rate over the window for the instantaneous rate and scaling
/// every 6-hour accumulation cutoff by `window_hours / 6` (a 24-hour
/// window compares against 4x the 6-hour cutoffs). A non-positive window
/// is a defined edge case and returns LOW with no rule evaluation.
pub fn classify_forecast(
    structure: &str,
    avg_rate_in_hr: f64,
    window_hours: f64,
    tide: &TideContext,
    thresholds: &RiskThresholds,
) -> RiskAssessment {
    if window_hours <= 0.0 {
        return RiskAssessment {
            level: RiskLevel::Low,
            reason: format!("Forecast window {:.1}h is empty", window_hours),
        };
    }

    let ctx = RuleContext {
        structure_lower: structure.to_lowercase(),
        rate: avg_rate_in_hr,
        accum: avg_rate_in_hr * window_hours,
        accum_scale: window_hours / 6.0,
        rate_label: "avg precip rate",
        accum_label: format!("{:.0}hr accumulation", window_hours),
        tide: *tide,
        thresholds,
    };
    run_rule_groups(&ctx)
}

fn run_rule_groups(ctx: &RuleContext) -> RiskAssessment {
    for group in RULE_GROUPS {
        if let Some(assessment) = group(ctx) {
            return assessment;
        }
    }
    default_group(ctx)
}

// ---------------------------------------------------------------------------
// Rule groups
// ---------------------------------------------------------------------------

fn underground(ctx: &RuleContext) -> Option<RiskAssessment> {
    if !ctx.structure_lower.contains("subway") {
        return None;
    }
    let t = ctx.thresholds;
    tiered_verdict(
        ctx,
        "Subway",
        t.subway_high_precip_rate,
        t.subway_high_accum_6hr,
        t.subway_atrisk_precip_rate,
        t.subway_atrisk_accum_6hr,
    )
}

fn open_cut(ctx: &RuleContext) -> Option<RiskAssessment> {
    if !ctx.structure_lower.contains("open cut") {
        return None;
    }
    let t = ctx.thresholds;
    tiered_verdict(
        ctx,
        "Open Cut",
        t.opencut_high_precip_rate,
        t.opencut_high_accum_6hr,
        t.opencut_atrisk_precip_rate,
        t.opencut_atrisk_accum_6hr,
    )
}

/// Coastal amplifier. Topically matched only when the station is coastal,
/// a tide level is present, and the level exceeds the gate; an absent
/// level disables the group for that evaluation.
fn coastal(ctx: &RuleContext) -> Option<RiskAssessment> {
    if !ctx.tide.is_coastal {
        return None;
    }
    let level = ctx.tide.level_ft?;
    let t = ctx.thresholds;
    if level <= t.tide_high_level {
        return None;
    }

    if ctx.rate > t.coastal_high_precip_rate {
        return Some(RiskAssessment {
            level: RiskLevel::High,
            reason: format!(
                "Coastal: tide {:.2}ft > {:.2}ft and {} {:.3} > {:.3} in/hr",
                level, t.tide_high_level, ctx.rate_label, ctx.rate, t.coastal_high_precip_rate
            ),
        });
    }
    if ctx.rate > t.coastal_atrisk_precip_rate {
        return Some(RiskAssessment {
            level: RiskLevel::AtRisk,
            reason: format!(
                "Coastal: tide {:.2}ft > {:.2}ft and {} {:.3} > {:.3} in/hr",
                level, t.tide_high_level, ctx.rate_label, ctx.rate, t.coastal_atrisk_precip_rate
            ),
        });
    }
    None
}

/// Elevated stations are terminal: once matched the group always concludes,
/// returning LOW when the rate is below the cutoff instead of deferring to
/// the default group.
fn elevated(ctx: &RuleContext) -> Option<RiskAssessment> {
    if !ctx.structure_lower.contains("elevated") {
        return None;
    }
    let cutoff = ctx.thresholds.elevated_atrisk_precip_rate;
    if ctx.rate > cutoff {
        Some(RiskAssessment {
            level: RiskLevel::AtRisk,
            reason: format!(
                "Elevated: {} {:.3} > {:.3} in/hr",
                ctx.rate_label, ctx.rate, cutoff
            ),
        })
    } else {
        Some(RiskAssessment {
            level: RiskLevel::Low,
            reason: format!(
                "Elevated: {} {:.3} <= {:.3} in/hr",
                ctx.rate_label, ctx.rate, cutoff
            ),
        })
    }
}

/// Catch-all for at-grade and unmatched structures, and for matched groups
/// that fell through without firing.
fn default_group(ctx: &RuleContext) -> RiskAssessment {
    let t = ctx.thresholds;
    tiered_verdict(
        ctx,
        "Default",
        t.default_high_precip_rate,
        t.default_high_accum_6hr,
        t.default_atrisk_precip_rate,
        t.default_atrisk_accum_6hr,
    )
    .unwrap_or_else(|| RiskAssessment {
        level: RiskLevel::Low,
        reason: format!(
            "Below thresholds: {} {:.3} in/hr, {} {:.3} in",
            ctx.rate_label, ctx.rate, ctx.accum_label, ctx.accum
        ),
    })
}

// ---------------------------------------------------------------------------
// Shared tier evaluation
// ---------------------------------------------------------------------------

/// The two-tier rate/accumulation check shared by the subway, open cut,
/// and default groups. Accumulation cutoffs are scaled for forecast
/// windows. Returns `None` when no tier fires.
fn tiered_verdict(
    ctx: &RuleContext,
    group: &str,
    high_rate: f64,
    high_accum_6hr: f64,
    atrisk_rate: f64,
    atrisk_accum_6hr: f64,
) -> Option<RiskAssessment> {
    let high_accum = high_accum_6hr * ctx.accum_scale;
    let atrisk_accum = atrisk_accum_6hr * ctx.accum_scale;

    if ctx.rate > high_rate {
        return Some(RiskAssessment {
            level: RiskLevel::High,
            reason: format!(
                "{}: {} {:.3} > {:.3} in/hr",
                group, ctx.rate_label, ctx.rate, high_rate
            ),
        });
    }
    if ctx.accum > high_accum {
        return Some(RiskAssessment {
            level: RiskLevel::High,
            reason: format!(
                "{}: {} {:.3} > {:.3} in",
                group, ctx.accum_label, ctx.accum, high_accum
            ),
        });
    }
    if ctx.rate > atrisk_rate {
        return Some(RiskAssessment {
            level: RiskLevel::AtRisk,
            reason: format!(
                "{}: {} {:.3} > {:.3} in/hr",
                group, ctx.rate_label, ctx.rate, atrisk_rate
            ),
        });
    }
    if ctx.accum > atrisk_accum {
        return Some(RiskAssessment {
            level: RiskLevel::AtRisk,
            reason: format!(
                "{}: {} {:.3} > {:.3} in",
                group, ctx.accum_label, ctx.accum, atrisk_accum
            ),
        });
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
