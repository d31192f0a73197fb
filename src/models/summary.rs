use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An extreme value and the hour it occurs at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    pub value: f64,
    pub occurred_at: DateTime<FixedOffset>,
}

/// Extrema over the rolling hourly window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySet {
    pub hottest: Extreme,
    pub coolest: Extreme,
    pub peak_rain_chance: Extreme,
    pub peak_wind: Extreme,
    pub peak_gust: Extreme,
}
