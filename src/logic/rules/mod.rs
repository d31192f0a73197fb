pub mod engine;
pub mod frost;
pub mod heatwave;
pub mod heavy_rain;
pub mod high_wind;

pub use engine::{derive_alerts, AlertEngine};

use crate::config::AlertThresholds;
use crate::models::{Alert, DailyPoint};

/// What the alert rules look at: the daily outlook and the gusts in the
/// rolling hourly window (a missing gust is `None`).
pub struct AlertInput<'a> {
    pub daily: &'a [DailyPoint],
    pub window_gusts: &'a [Option<f64>],
    pub outlook_days: u32,
}

/// Trait for forecast alert rules
pub trait AlertRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return an alert if its threshold is reached
    fn evaluate(&self, input: &AlertInput<'_>, thresholds: &AlertThresholds) -> Option<Alert>;
}
