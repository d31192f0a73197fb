//! Location resolution against the Open-Meteo geocoding API.
//! Every lookup goes to the network; nothing is cached.

use super::{build_url, get_json, http_client};
use crate::config::Config;
use crate::error::{AgriWeatherError, Result};
use crate::models::{validate_coordinates, GeoRecord};
use async_trait::async_trait;
use serde::Deserialize;

#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Best single match for a free-text place name
    async fn resolve_by_name(&self, query: &str) -> Result<GeoRecord>;

    /// Nearest named place to a coordinate pair
    async fn resolve_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<GeoRecord>;
}

pub struct OpenMeteoGeocoder {
    client: reqwest::Client,
    search_url: String,
    reverse_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl GeocodingResult {
    /// "<place>, <admin-region>" when the region is known
    fn search_label(&self) -> String {
        match self.admin1.as_deref().filter(|a| !a.is_empty()) {
            Some(admin) => format!("{}, {}", self.name, admin),
            None => self.name.clone(),
        }
    }
}

impl OpenMeteoGeocoder {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout())?,
            search_url: config.endpoints.geocoding_url.clone(),
            reverse_url: config.endpoints.reverse_geocoding_url.clone(),
            language: config.endpoints.language.clone(),
        })
    }

    async fn first_result(&self, url: reqwest::Url) -> Result<Option<GeocodingResult>> {
        let response: GeocodingResponse = get_json(&self.client, url, "Geocoding").await?;
        Ok(response.results.and_then(|r| r.into_iter().next()))
    }

    /// Probe the search endpoint with a well-known place
    pub async fn test_connection(&self) -> Result<bool> {
        Ok(self.resolve_by_name("London").await.is_ok())
    }
}

#[async_trait]
impl LocationResolver for OpenMeteoGeocoder {
    async fn resolve_by_name(&self, query: &str) -> Result<GeoRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgriWeatherError::NotFound("empty query".into()));
        }

        tracing::debug!("Geocoding location name: {}", query);
        let url = build_url(
            &self.search_url,
            &[
                ("name", query.to_string()),
                ("count", "1".to_string()),
                ("language", self.language.clone()),
                ("format", "json".to_string()),
            ],
        )?;

        let result = self
            .first_result(url)
            .await?
            .ok_or_else(|| AgriWeatherError::NotFound(query.to_string()))?;

        let geo = GeoRecord::new(
            result.search_label(),
            result.latitude,
            result.longitude,
            result.country,
        )?;
        tracing::info!(
            "Resolved '{}' to {} ({}, {})",
            query,
            geo.label(),
            geo.latitude(),
            geo.longitude()
        );
        Ok(geo)
    }

    async fn resolve_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<GeoRecord> {
        validate_coordinates(latitude, longitude)?;

        tracing::debug!("Reverse geocoding ({}, {})", latitude, longitude);
        let url = build_url(
            &self.reverse_url,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("language", self.language.clone()),
                ("format", "json".to_string()),
            ],
        )?;

        let result = self.first_result(url).await?.ok_or_else(|| {
            AgriWeatherError::NotFound(format!("no place near ({}, {})", latitude, longitude))
        })?;

        // Keep the device's own coordinates; only the name comes from the service.
        let geo = GeoRecord::new(result.name, latitude, longitude, result.country)?;
        tracing::info!("Reverse geocoded to: {}", geo.label());
        Ok(geo)
    }
}
