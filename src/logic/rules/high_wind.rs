use super::{AlertInput, AlertRule};
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertKind};

/// High wind rule - looks at gusts in the rolling hourly window only
///
/// Conditions:
/// - Strongest gust (missing gusts count as 0) at or above `high_wind_gust_kmh`
///
/// The reported gust is rounded to whole km/h.
pub struct HighWindRule;

impl AlertRule for HighWindRule {
    fn id(&self) -> &'static str {
        "high_wind"
    }

    fn name(&self) -> &'static str {
        "High Wind"
    }

    fn evaluate(&self, input: &AlertInput<'_>, thresholds: &AlertThresholds) -> Option<Alert> {
        let max_gust = input
            .window_gusts
            .iter()
            .map(|g| g.unwrap_or(0.0))
            .fold(0.0_f64, f64::max);

        if max_gust < thresholds.high_wind_gust_kmh {
            return None;
        }

        Some(Alert::new(
            AlertKind::HighWind,
            format!("High winds expected: gusts up to {} km/h", max_gust.round() as i64),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(gusts: &[Option<f64>]) -> Option<Alert> {
        let input = AlertInput {
            daily: &[],
            window_gusts: gusts,
            outlook_days: 7,
        };
        HighWindRule.evaluate(&input, &AlertThresholds::default())
    }

    #[test]
    fn rounds_reported_gust() {
        let alert = evaluate(&[Some(61.4), None, Some(72.5)]).unwrap();
        assert_eq!(alert.message, "High winds expected: gusts up to 73 km/h");
    }

    #[test]
    fn missing_gusts_count_as_calm() {
        assert!(evaluate(&[None, None]).is_none());
        assert!(evaluate(&[]).is_none());
    }
}
