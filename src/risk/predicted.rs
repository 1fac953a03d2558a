/// Predicted risk projection from windowed forecast totals.
///
/// Feeds the 6-hour and 24-hour forecast totals produced by
/// `forecast::aggregate_windows` through the same rule engine used for
/// observed conditions, as an average rate over each window. An absent
/// total (upstream aggregation failure) yields an absent assessment —
/// never a fabricated LOW.

use crate::config::RiskThresholds;
use crate::model::{RiskAssessment, TideContext};
use crate::risk::classifier::classify_forecast;

/// Projects forecast totals into predicted 6-hour and 24-hour verdicts.
pub fn project_predicted_risk(
    structure: &str,
    total_6hr_in: Option<f64>,
    total_24hr_in: Option<f64>,
    tide: &TideContext,
    thresholds: &RiskThresholds,
) -> (Option<RiskAssessment>, Option<RiskAssessment>) {
    let predicted_6hr = total_6hr_in
        .map(|total| classify_forecast(structure, total / 6.0, 6.0, tide, thresholds));
    let predicted_24hr = total_24hr_in
        .map(|total| classify_forecast(structure, total / 24.0, 24.0, tide, thresholds));
    (predicted_6hr, predicted_24hr)
}
