use super::{build_url, get_json, http_client};
use crate::config::Config;
use crate::error::{AgriWeatherError, Result};
use crate::models::{CurrentConditions, DailyPoint, ForecastBundle, GeoRecord, HourPoint};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;

const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum,sunrise,sunset";
const HOURLY_FIELDS: &str =
    "temperature_2m,relativehumidity_2m,precipitation_probability,windspeed_10m,windgusts_10m";
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    async fn fetch_forecast(&self, geo: &GeoRecord) -> Result<ForecastBundle>;
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    forecast_url: String,
    forecast_days: u32,
}

// Open-Meteo API response structures. Series are parallel arrays indexed by `time`.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    daily: Option<DailySeries>,
    #[serde(default)]
    hourly: Option<HourlySeries>,
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    weathercode: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    sunrise: Option<Vec<Option<String>>>,
    #[serde(default)]
    sunset: Option<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relativehumidity_2m: Vec<Option<f64>>,
    precipitation_probability: Vec<Option<f64>>,
    windspeed_10m: Vec<Option<f64>>,
    windgusts_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
}

impl OpenMeteoClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout())?,
            forecast_url: config.endpoints.forecast_url.clone(),
            forecast_days: config.forecast_days,
        })
    }

    /// Test connection to the forecast API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = build_url(
            &self.forecast_url,
            &[
                ("latitude", "0".to_string()),
                ("longitude", "0".to_string()),
                ("current_weather", "true".to_string()),
            ],
        )?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgriWeatherError::from_reqwest("Forecast", e))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoClient {
    async fn fetch_forecast(&self, geo: &GeoRecord) -> Result<ForecastBundle> {
        let url = build_url(
            &self.forecast_url,
            &[
                ("latitude", geo.latitude().to_string()),
                ("longitude", geo.longitude().to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
            ],
        )?;

        tracing::debug!("Fetching forecast for {}", geo.label());
        let response: ForecastResponse = get_json(&self.client, url, "Forecast").await?;
        let bundle = convert_response(response)?;
        tracing::debug!(
            "Forecast for {}: {} days, {} hours",
            geo.label(),
            bundle.daily.len(),
            bundle.hourly.len()
        );
        Ok(bundle)
    }
}

fn convert_response(response: ForecastResponse) -> Result<ForecastBundle> {
    let zone = LocalZone::from_response(&response)?;

    let daily_series = response
        .daily
        .filter(|d| !d.time.is_empty())
        .ok_or_else(|| AgriWeatherError::EmptySeries("daily".into()))?;
    let hourly_series = response
        .hourly
        .filter(|h| !h.time.is_empty())
        .ok_or_else(|| AgriWeatherError::EmptySeries("hourly".into()))?;

    let daily = convert_daily(&daily_series)?;
    let hourly = convert_hourly(&hourly_series, &zone)?;

    let first_of = |series: &Option<Vec<Option<String>>>, field: &str| -> Result<Option<DateTime<FixedOffset>>> {
        match series {
            Some(values) => {
                check_len(field, values.len(), daily_series.time.len())?;
                values
                    .first()
                    .and_then(|v| v.as_deref())
                    .map(|raw| parse_local_time(raw, &zone, None, field))
                    .transpose()
            }
            None => Ok(None),
        }
    };
    let sunrise = first_of(&daily_series.sunrise, "daily.sunrise")?;
    let sunset = first_of(&daily_series.sunset, "daily.sunset")?;

    let current = response.current_weather.map(|c| CurrentConditions {
        temp_c: c.temperature,
        wind_speed_kmh: c.windspeed,
    });

    Ok(ForecastBundle {
        daily,
        hourly,
        current,
        sunrise,
        sunset,
    })
}

fn convert_daily(series: &DailySeries) -> Result<Vec<DailyPoint>> {
    let n = series.time.len();
    check_len("daily.weathercode", series.weathercode.len(), n)?;
    check_len("daily.temperature_2m_max", series.temperature_2m_max.len(), n)?;
    check_len("daily.temperature_2m_min", series.temperature_2m_min.len(), n)?;
    check_len("daily.precipitation_sum", series.precipitation_sum.len(), n)?;

    series
        .time
        .iter()
        .enumerate()
        .map(|(i, raw_date)| {
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
                AgriWeatherError::MalformedResponse(format!(
                    "daily.time[{}] '{}': {}",
                    i, raw_date, e
                ))
            })?;
            Ok(DailyPoint {
                date,
                temp_max_c: required(&series.temperature_2m_max, i, "daily.temperature_2m_max")?,
                temp_min_c: required(&series.temperature_2m_min, i, "daily.temperature_2m_min")?,
                precip_total_mm: required(&series.precipitation_sum, i, "daily.precipitation_sum")?,
                weather_code: required(&series.weathercode, i, "daily.weathercode")?,
            })
        })
        .collect()
}

fn convert_hourly(series: &HourlySeries, zone: &LocalZone) -> Result<Vec<HourPoint>> {
    let n = series.time.len();
    check_len("hourly.temperature_2m", series.temperature_2m.len(), n)?;
    check_len("hourly.relativehumidity_2m", series.relativehumidity_2m.len(), n)?;
    check_len(
        "hourly.precipitation_probability",
        series.precipitation_probability.len(),
        n,
    )?;
    check_len("hourly.windspeed_10m", series.windspeed_10m.len(), n)?;
    check_len("hourly.windgusts_10m", series.windgusts_10m.len(), n)?;

    let mut previous = None;
    series
        .time
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let timestamp = parse_local_time(raw, zone, previous, "hourly.time")?;
            previous = Some(timestamp);
            Ok(HourPoint {
                timestamp,
                temp_c: required(&series.temperature_2m, i, "hourly.temperature_2m")?,
                humidity_percent: required(
                    &series.relativehumidity_2m,
                    i,
                    "hourly.relativehumidity_2m",
                )?,
                precip_probability: series.precipitation_probability[i],
                wind_speed_kmh: required(&series.windspeed_10m, i, "hourly.windspeed_10m")?,
                wind_gust_kmh: series.windgusts_10m[i],
            })
        })
        .collect()
}

fn check_len(field: &str, len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(AgriWeatherError::MalformedResponse(format!(
            "{} has {} values, expected {}",
            field, len, expected
        )));
    }
    Ok(())
}

fn required<T: Copy>(values: &[Option<T>], index: usize, field: &str) -> Result<T> {
    values
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| AgriWeatherError::MalformedResponse(format!("{}[{}] is null", field, index)))
}

/// Timezone the response's local wall-clock strings are written in.
///
/// The named zone is preferred: `utc_offset_seconds` is only the offset at
/// request time and goes stale across a daylight-saving change.
enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    fn from_response(response: &ForecastResponse) -> Result<Self> {
        if let Some(name) = response.timezone.as_deref() {
            match name.parse::<Tz>() {
                Ok(tz) => return Ok(LocalZone::Named(tz)),
                Err(e) => tracing::debug!(
                    "Unknown timezone '{}' ({}), using utc_offset_seconds",
                    name,
                    e
                ),
            }
        }
        FixedOffset::east_opt(response.utc_offset_seconds)
            .map(LocalZone::Fixed)
            .ok_or_else(|| {
                AgriWeatherError::MalformedResponse(format!(
                    "utc_offset_seconds out of range: {}",
                    response.utc_offset_seconds
                ))
            })
    }

    fn resolve(
        &self,
        naive: &NaiveDateTime,
        previous: Option<DateTime<FixedOffset>>,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            LocalZone::Named(tz) => pick(tz.from_local_datetime(naive), previous),
            LocalZone::Fixed(offset) => pick(offset.from_local_datetime(naive), previous),
        }
    }
}

/// A repeated wall-clock hour (clocks going back) takes the later instant
/// once the earlier one has already been used.
fn pick<Z: TimeZone>(
    local: LocalResult<DateTime<Z>>,
    previous: Option<DateTime<FixedOffset>>,
) -> Option<DateTime<FixedOffset>> {
    match local {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, latest) => {
            let earliest = earliest.fixed_offset();
            if previous.is_some_and(|p| earliest <= p) {
                Some(latest.fixed_offset())
            } else {
                Some(earliest)
            }
        }
        LocalResult::None => None,
    }
}

/// Times come back as local wall-clock strings for the location's timezone.
fn parse_local_time(
    raw: &str,
    zone: &LocalZone,
    previous: Option<DateTime<FixedOffset>>,
    field: &str,
) -> Result<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_TIME_FORMAT).map_err(|e| {
        AgriWeatherError::MalformedResponse(format!("{} '{}': {}", field, raw, e))
    })?;
    zone.resolve(&naive, previous).ok_or_else(|| {
        AgriWeatherError::MalformedResponse(format!(
            "{} '{}' does not exist in the local timezone",
            field, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::slice_rolling_window;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        json!({
            "latitude": 19.07,
            "longitude": 72.88,
            "utc_offset_seconds": 19800,
            "timezone": "Asia/Kolkata",
            "current_weather": { "temperature": 29.4, "windspeed": 11.2, "weathercode": 3 },
            "daily": {
                "time": ["2024-07-01", "2024-07-02"],
                "weathercode": [63, 82],
                "temperature_2m_max": [31.0, 30.2],
                "temperature_2m_min": [26.1, 25.8],
                "precipitation_sum": [12.4, 48.9],
                "sunrise": ["2024-07-01T06:03", "2024-07-02T06:03"],
                "sunset": ["2024-07-01T19:18", "2024-07-02T19:18"]
            },
            "hourly": {
                "time": ["2024-07-01T00:00", "2024-07-01T01:00", "2024-07-01T02:00"],
                "temperature_2m": [27.0, 26.8, 26.5],
                "relativehumidity_2m": [88.0, 89.0, 90.0],
                "precipitation_probability": [40.0, null, 65.0],
                "windspeed_10m": [14.0, 15.5, 13.2],
                "windgusts_10m": [30.0, 33.1, null]
            }
        })
    }

    fn geo() -> GeoRecord {
        GeoRecord::new("Mumbai, Maharashtra", 19.07, 72.88, Some("India".into())).unwrap()
    }

    fn parse(body: serde_json::Value) -> Result<ForecastBundle> {
        convert_response(serde_json::from_value(body)?)
    }

    #[test]
    fn converts_index_aligned_series() {
        let bundle = parse(sample_body()).unwrap();

        assert_eq!(bundle.daily.len(), 2);
        assert_eq!(bundle.daily[1].date, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert_eq!(bundle.daily[1].precip_total_mm, 48.9);
        assert_eq!(bundle.daily[1].weather_code, 82);

        assert_eq!(bundle.hourly.len(), 3);
        assert_eq!(bundle.hourly[1].precip_probability, None);
        assert_eq!(bundle.hourly[2].wind_gust_kmh, None);
        assert_eq!(bundle.hourly[0].timestamp.to_rfc3339(), "2024-07-01T00:00:00+05:30");

        let current = bundle.current.unwrap();
        assert_eq!(current.temp_c, 29.4);
        assert_eq!(current.wind_speed_kmh, 11.2);
        assert_eq!(
            bundle.sunrise.unwrap().to_rfc3339(),
            "2024-07-01T06:03:00+05:30"
        );
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let mut body = sample_body();
        body["hourly"]["windspeed_10m"] = json!([14.0, 15.5]);
        let err = parse(body).unwrap_err();
        assert!(
            matches!(err, AgriWeatherError::MalformedResponse(ref m) if m.contains("hourly.windspeed_10m"))
        );

        let mut body = sample_body();
        body["daily"]["temperature_2m_min"] = json!([26.1]);
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::MalformedResponse(_)
        ));
    }

    #[test]
    fn missing_or_empty_series_is_empty_series() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("hourly");
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::EmptySeries(ref s) if s == "hourly"
        ));

        let mut body = sample_body();
        for key in [
            "time",
            "weathercode",
            "temperature_2m_max",
            "temperature_2m_min",
            "precipitation_sum",
            "sunrise",
            "sunset",
        ] {
            body["daily"][key] = json!([]);
        }
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::EmptySeries(ref s) if s == "daily"
        ));
    }

    #[test]
    fn null_required_value_is_malformed() {
        let mut body = sample_body();
        body["daily"]["temperature_2m_max"] = json!([31.0, null]);
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::MalformedResponse(ref m) if m == "daily.temperature_2m_max[1] is null"
        ));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let mut body = sample_body();
        body["hourly"]["time"] = json!(["2024-07-01T00:00", "yesterday", "2024-07-01T02:00"]);
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::MalformedResponse(_)
        ));
    }

    /// Requested on 2026-10-24 (CEST, +02:00); the series runs past the
    /// switch back to CET (+01:00) in the early hours of 2026-10-25.
    fn berlin_body(hours: &[&str]) -> serde_json::Value {
        let n = hours.len();
        json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "utc_offset_seconds": 7200,
            "timezone": "Europe/Berlin",
            "daily": {
                "time": ["2026-10-26"],
                "weathercode": [3],
                "temperature_2m_max": [11.0],
                "temperature_2m_min": [4.0],
                "precipitation_sum": [0.4],
                "sunrise": ["2026-10-26T06:59"],
                "sunset": ["2026-10-26T16:42"]
            },
            "hourly": {
                "time": hours,
                "temperature_2m": vec![8.0; n],
                "relativehumidity_2m": vec![80.0; n],
                "precipitation_probability": vec![10.0; n],
                "windspeed_10m": vec![12.0; n],
                "windgusts_10m": vec![20.0; n]
            }
        })
    }

    #[test]
    fn local_times_follow_the_named_timezone_after_dst_change() {
        let bundle = parse(berlin_body(&[
            "2026-10-26T08:00",
            "2026-10-26T09:00",
            "2026-10-26T10:00",
            "2026-10-26T11:00",
            "2026-10-26T12:00",
            "2026-10-26T13:00",
        ]))
        .unwrap();

        assert_eq!(bundle.hourly[2].timestamp.to_rfc3339(), "2026-10-26T10:00:00+01:00");
        assert_eq!(bundle.sunrise.unwrap().to_rfc3339(), "2026-10-26T06:59:00+01:00");

        let now = Utc.with_ymd_and_hms(2026, 10, 26, 8, 30, 0).unwrap();
        let window = slice_rolling_window(&bundle.hourly, now);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].timestamp.to_rfc3339(), "2026-10-26T10:00:00+01:00");
    }

    #[test]
    fn repeated_hour_maps_to_increasing_instants() {
        let bundle = parse(berlin_body(&[
            "2026-10-25T01:00",
            "2026-10-25T02:00",
            "2026-10-25T02:00",
            "2026-10-25T03:00",
        ]))
        .unwrap();

        let utc: Vec<_> = bundle
            .hourly
            .iter()
            .map(|h| h.timestamp.with_timezone(&Utc).to_rfc3339())
            .collect();
        assert_eq!(
            utc,
            vec![
                "2026-10-24T23:00:00+00:00",
                "2026-10-25T00:00:00+00:00",
                "2026-10-25T01:00:00+00:00",
                "2026-10-25T02:00:00+00:00",
            ]
        );
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc_offset() {
        let mut body = sample_body();
        body["timezone"] = json!("Mars/Olympus_Mons");
        let bundle = parse(body).unwrap();
        assert_eq!(bundle.hourly[0].timestamp.to_rfc3339(), "2024-07-01T00:00:00+05:30");
    }

    #[test]
    fn skipped_local_hour_is_malformed() {
        // Clocks jump from 02:00 to 03:00 on 2026-03-29 in Berlin.
        let mut body = berlin_body(&["2026-03-29T01:00", "2026-03-29T02:00"]);
        body["utc_offset_seconds"] = json!(3600);
        assert!(matches!(
            parse(body).unwrap_err(),
            AgriWeatherError::MalformedResponse(ref m) if m.contains("2026-03-29T02:00")
        ));
    }

    #[tokio::test]
    async fn fetches_with_requested_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "19.07"))
            .and(query_param("longitude", "72.88"))
            .and(query_param("daily", DAILY_FIELDS))
            .and(query_param("hourly", HOURLY_FIELDS))
            .and(query_param("current_weather", "true"))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.endpoints.forecast_url = format!("{}/v1/forecast", server.uri());
        let client = OpenMeteoClient::new(&config).unwrap();

        let bundle = client.fetch_forecast(&geo()).await.unwrap();
        assert_eq!(bundle.daily.len(), 2);
        assert_eq!(bundle.hourly.len(), 3);
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.endpoints.forecast_url = format!("{}/v1/forecast", server.uri());
        let client = OpenMeteoClient::new(&config).unwrap();

        let err = client.fetch_forecast(&geo()).await.unwrap_err();
        assert!(matches!(err, AgriWeatherError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let mut config = Config::default();
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        config.endpoints.forecast_url = "http://127.0.0.1:9/v1/forecast".into();
        let client = OpenMeteoClient::new(&config).unwrap();

        let err = client.fetch_forecast(&geo()).await.unwrap_err();
        assert!(matches!(err, AgriWeatherError::Network(_)));
    }
}
