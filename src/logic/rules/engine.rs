use super::{
    frost::FrostRule, heatwave::HeatwaveRule, heavy_rain::HeavyRainRule,
    high_wind::HighWindRule, AlertInput, AlertRule,
};
use crate::config::AlertThresholds;
use crate::models::{Alert, DailyPoint};

pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
    thresholds: AlertThresholds,
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        // Evaluation order is display order.
        let rules: Vec<Box<dyn AlertRule>> = vec![
            Box::new(HeavyRainRule),
            Box::new(HeatwaveRule),
            Box::new(FrostRule),
            Box::new(HighWindRule),
        ];

        Self { rules, thresholds }
    }

    pub fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(input, &self.thresholds))
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(AlertThresholds::default())
    }
}

/// Alerts for a daily outlook plus the gusts of the rolling hourly window.
/// An empty result means nothing reached a threshold.
pub fn derive_alerts(
    daily: &[DailyPoint],
    window_gusts: &[Option<f64>],
    thresholds: &AlertThresholds,
    outlook_days: u32,
) -> Vec<Alert> {
    let input = AlertInput {
        daily,
        window_gusts,
        outlook_days,
    };
    AlertEngine::new(thresholds.clone()).evaluate(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertKind;
    use chrono::NaiveDate;

    fn day(offset: u32, max: f64, min: f64, precip: f64) -> DailyPoint {
        DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 6, 1 + offset).unwrap(),
            temp_max_c: max,
            temp_min_c: min,
            precip_total_mm: precip,
            weather_code: 3,
        }
    }

    fn messages(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.message.as_str()).collect()
    }

    #[test]
    fn heavy_rain_only() {
        let daily = vec![day(0, 30.0, 20.0, 25.0)];
        let alerts = derive_alerts(&daily, &[], &AlertThresholds::default(), 7);
        assert_eq!(
            messages(&alerts),
            vec!["Heavy rain expected (>20mm) in the next 7 days"]
        );
    }

    #[test]
    fn calm_week_has_no_alerts() {
        let daily: Vec<_> = (0..7).map(|i| day(i, 25.0, 10.0, 2.0)).collect();
        let gusts = vec![Some(35.0), None, Some(59.9)];
        assert!(derive_alerts(&daily, &gusts, &AlertThresholds::default(), 7).is_empty());
    }

    #[test]
    fn rule_order_is_fixed() {
        // Triggers arrive in reverse order across the week; output order must not follow them.
        let daily = vec![
            day(0, 5.0, -3.0, 0.0),
            day(1, 42.0, 28.0, 0.0),
            day(2, 30.0, 22.0, 55.0),
        ];
        let gusts = vec![Some(90.0)];
        let alerts = derive_alerts(&daily, &gusts, &AlertThresholds::default(), 7);
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::HeavyRain,
                AlertKind::Heatwave,
                AlertKind::Frost,
                AlertKind::HighWind
            ]
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        let daily = vec![day(0, 40.0, 0.0, 20.0)];
        let gusts = vec![Some(60.0)];
        let alerts = derive_alerts(&daily, &gusts, &AlertThresholds::default(), 7);
        assert_eq!(
            messages(&alerts),
            vec![
                "Heavy rain expected (>20mm) in the next 7 days",
                "Heatwave risk: max temp ≥ 40°C",
                "Frost risk: min temp ≤ 0°C",
                "High winds expected: gusts up to 60 km/h",
            ]
        );
    }

    #[test]
    fn custom_thresholds_change_triggers_and_text() {
        let thresholds = AlertThresholds {
            heavy_rain_mm: 12.5,
            heatwave_max_c: 35.0,
            frost_min_c: 2.0,
            high_wind_gust_kmh: 45.0,
        };
        let daily = vec![day(0, 36.0, 1.0, 13.0)];
        let alerts = derive_alerts(&daily, &[Some(47.4)], &thresholds, 5);
        assert_eq!(
            messages(&alerts),
            vec![
                "Heavy rain expected (>12.5mm) in the next 5 days",
                "Heatwave risk: max temp ≥ 35°C",
                "Frost risk: min temp ≤ 2°C",
                "High winds expected: gusts up to 47 km/h",
            ]
        );
    }

    #[test]
    fn derive_alerts_is_repeatable() {
        let daily = vec![day(0, 41.0, 12.0, 3.0)];
        let gusts = vec![Some(70.2), None];
        let t = AlertThresholds::default();
        assert_eq!(
            derive_alerts(&daily, &gusts, &t, 7),
            derive_alerts(&daily, &gusts, &t, 7)
        );
    }

    #[test]
    fn lists_rules_in_evaluation_order() {
        let ids: Vec<_> = AlertEngine::default()
            .list_rules()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["heavy_rain", "heatwave", "frost", "high_wind"]);
    }
}
