use super::{AlertInput, AlertRule};
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertKind};

/// Frost rule - any forecast day with a min temperature at or below `frost_min_c`
pub struct FrostRule;

impl AlertRule for FrostRule {
    fn id(&self) -> &'static str {
        "frost"
    }

    fn name(&self) -> &'static str {
        "Frost"
    }

    fn evaluate(&self, input: &AlertInput<'_>, thresholds: &AlertThresholds) -> Option<Alert> {
        input
            .daily
            .iter()
            .any(|d| d.temp_min_c <= thresholds.frost_min_c)
            .then(|| {
                Alert::new(
                    AlertKind::Frost,
                    format!("Frost risk: min temp ≤ {}°C", thresholds.frost_min_c),
                )
            })
    }
}
