use super::{AlertInput, AlertRule};
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertKind};

/// Heavy rain rule - flags waterlogging and runoff risk for standing crops
///
/// Conditions:
/// - Any forecast day with a precipitation total at or above `heavy_rain_mm`
pub struct HeavyRainRule;

impl AlertRule for HeavyRainRule {
    fn id(&self) -> &'static str {
        "heavy_rain"
    }

    fn name(&self) -> &'static str {
        "Heavy Rain"
    }

    fn evaluate(&self, input: &AlertInput<'_>, thresholds: &AlertThresholds) -> Option<Alert> {
        let first_heavy_mm = input
            .daily
            .iter()
            .map(|d| d.precip_total_mm)
            .find(|mm| *mm >= thresholds.heavy_rain_mm)?;

        tracing::debug!(
            "Heavy rain rule triggered: first heavy day {}mm >= {}mm",
            first_heavy_mm,
            thresholds.heavy_rain_mm
        );
        Some(Alert::new(
            AlertKind::HeavyRain,
            format!(
                "Heavy rain expected (>{}mm) in the next {} days",
                thresholds.heavy_rain_mm, input.outlook_days
            ),
        ))
    }
}
