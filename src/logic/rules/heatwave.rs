use super::{AlertInput, AlertRule};
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertKind};

/// Heatwave rule - warns about heat stress on crops and livestock
///
/// Conditions:
/// - Any forecast day with a max temperature at or above `heatwave_max_c`
pub struct HeatwaveRule;

impl AlertRule for HeatwaveRule {
    fn id(&self) -> &'static str {
        "heatwave"
    }

    fn name(&self) -> &'static str {
        "Heatwave"
    }

    fn evaluate(&self, input: &AlertInput<'_>, thresholds: &AlertThresholds) -> Option<Alert> {
        if !input
            .daily
            .iter()
            .any(|d| d.temp_max_c >= thresholds.heatwave_max_c)
        {
            return None;
        }

        Some(Alert::new(
            AlertKind::Heatwave,
            format!("Heatwave risk: max temp ≥ {}°C", thresholds.heatwave_max_c),
        ))
    }
}
