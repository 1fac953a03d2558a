/// Risk evaluation for the transit flood monitoring service.
///
/// Submodules:
/// - `classifier` — structure-aware, multi-tier threshold classification of
///   observed and forecast-projected conditions.
/// - `predicted` — projects windowed forecast totals through the classifier.

pub mod classifier;
pub mod predicted;

pub use classifier::{classify, classify_forecast};
pub use predicted::project_predicted_risk;
