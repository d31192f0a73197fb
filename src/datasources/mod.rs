pub mod device;
pub mod geocoding;
pub mod openmeteo;

pub use device::{ConfiguredLocator, DeviceLocator, DevicePosition};
pub use geocoding::{LocationResolver, OpenMeteoGeocoder};
pub use openmeteo::{ForecastFetcher, OpenMeteoClient};

use crate::error::{AgriWeatherError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Body Open-Meteo sends with a 4xx
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: Option<String>,
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("agriweather/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AgriWeatherError::Network(format!("failed to build HTTP client: {}", e)))
}

pub(crate) fn build_url(base: &str, params: &[(&str, String)]) -> Result<reqwest::Url> {
    reqwest::Url::parse_with_params(base, params)
        .map_err(|e| AgriWeatherError::Config(format!("invalid endpoint '{}': {}", base, e)))
}

/// GET `url` and decode the JSON body. Transport failures and non-2xx statuses
/// are network errors; a body that doesn't match `T` is a malformed response.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: reqwest::Url,
    service: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AgriWeatherError::from_reqwest(service, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AgriWeatherError::from_reqwest(service, e))?;

    if !status.is_success() {
        let reason = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.reason)
            .unwrap_or_else(|| truncate_body(&body));
        return Err(AgriWeatherError::Network(format!(
            "{} returned {}: {}",
            service, status, reason
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        AgriWeatherError::MalformedResponse(format!("failed to parse {} response: {}", service, e))
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("Bad Request"), "Bad Request");
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).chars().count(), 201);
    }

    #[test]
    fn build_url_encodes_query() {
        let url = build_url(
            "https://geocoding-api.open-meteo.com/v1/search",
            &[("name", "São Paulo".to_string()), ("count", "1".to_string())],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://geocoding-api.open-meteo.com/v1/search?name=S%C3%A3o+Paulo&count=1"
        );
    }

    #[test]
    fn build_url_rejects_relative_base() {
        let err = build_url("not a url", &[]).unwrap_err();
        assert!(matches!(err, AgriWeatherError::Config(_)));
    }
}
