use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Everything the forecast service returns for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub daily: Vec<DailyPoint>,
    pub hourly: Vec<HourPoint>,
    pub current: Option<CurrentConditions>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
}

/// One forecast day, in the location's calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub precip_total_mm: f64,
    pub weather_code: i32,
}

impl DailyPoint {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }

    /// Card heading, e.g. "Sat, Oct 17"
    pub fn day_label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }

    /// Rounded "max° / min°"
    pub fn temp_range_label(&self) -> String {
        format!(
            "{}° / {}°",
            round_whole(self.temp_max_c),
            round_whole(self.temp_min_c)
        )
    }

    pub fn rain_label(&self) -> String {
        format!("Rain {}mm", round_whole(self.precip_total_mm))
    }
}

// Rounded to a whole number without a "-0" for small negatives.
fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

/// A single hourly forecast point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub temp_c: f64,
    pub humidity_percent: f64,
    pub precip_probability: Option<f64>, // 0-100
    pub wind_speed_kmh: f64,
    pub wind_gust_kmh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub wind_speed_kmh: f64,
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Sleet,
    Snow,
    Thunderstorm,
    Other,
}

impl WeatherCondition {
    /// See https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1 | 2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Cloudy,
            45 | 48 => WeatherCondition::Fog,
            51 | 53 | 55 => WeatherCondition::Drizzle,
            56 | 57 | 66 | 67 => WeatherCondition::Sleet,
            61 | 63 | 80 => WeatherCondition::Rain,
            65 | 81 | 82 => WeatherCondition::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => WeatherCondition::Snow,
            95 | 96 | 99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::HeavyRain => "Heavy rain",
            WeatherCondition::Sleet => "Sleet",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Other => "Unknown",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "☀",
            WeatherCondition::PartlyCloudy => "⛅",
            WeatherCondition::Cloudy => "☁",
            WeatherCondition::Fog => "🌫",
            WeatherCondition::Drizzle => "🌦",
            WeatherCondition::Rain | WeatherCondition::HeavyRain => "🌧",
            WeatherCondition::Sleet | WeatherCondition::Snow => "❄",
            WeatherCondition::Thunderstorm => "⛈",
            WeatherCondition::Other => "?",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_card_labels() {
        let day = DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            temp_max_c: 31.6,
            temp_min_c: -0.4,
            precip_total_mm: 12.5,
            weather_code: 61,
        };
        assert_eq!(day.day_label(), "Sat, Oct 17");
        assert_eq!(day.temp_range_label(), "32° / 0°");
        assert_eq!(day.rain_label(), "Rain 13mm");

        let early = DailyPoint {
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            ..day
        };
        assert_eq!(early.day_label(), "Mon, Nov 2");
    }

    #[test]
    fn weather_condition_from_wmo_code() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(65), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_wmo_code(66), WeatherCondition::Sleet);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(42), WeatherCondition::Other);
    }

    #[test]
    fn daily_point_condition_uses_code() {
        let day = DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            temp_max_c: 31.0,
            temp_min_c: 24.0,
            precip_total_mm: 40.0,
            weather_code: 82,
        };
        assert_eq!(day.condition(), WeatherCondition::HeavyRain);
        assert_eq!(day.condition().to_string(), "Heavy rain");
    }
}
