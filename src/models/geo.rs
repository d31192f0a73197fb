use crate::error::{AgriWeatherError, Result};
use serde::Serialize;

/// A resolved location. Coordinates are validated on construction and the
/// record is never mutated afterwards. Output only: the sole way in is `new`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    label: String,
    latitude: f64,
    longitude: f64,
    country_label: Option<String>,
}

impl GeoRecord {
    pub fn new(
        label: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country_label: Option<String>,
    ) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            label: label.into(),
            latitude,
            longitude,
            country_label: country_label.filter(|c| !c.is_empty()),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn country_label(&self) -> Option<&str> {
        self.country_label.as_deref()
    }

    /// "<label>, <country>" when a country is known.
    pub fn display_name(&self) -> String {
        match &self.country_label {
            Some(country) => format!("{}, {}", self.label, country),
            None => self.label.clone(),
        }
    }
}

impl std::fmt::Display for GeoRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AgriWeatherError::MalformedResponse(format!(
            "coordinates out of range: ({}, {})",
            latitude, longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_includes_country() {
        let geo = GeoRecord::new("Mumbai, Maharashtra", 19.07, 72.88, Some("India".into()))
            .unwrap();
        assert_eq!(geo.display_name(), "Mumbai, Maharashtra, India");

        let geo = GeoRecord::new("My location", 19.07, 72.88, None).unwrap();
        assert_eq!(geo.display_name(), "My location");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoRecord::new("North", 90.5, 0.0, None).is_err());
        assert!(GeoRecord::new("East", 0.0, -180.1, None).is_err());
        assert!(GeoRecord::new("Pole", 90.0, 180.0, None).is_ok());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(GeoRecord::new("Nowhere", f64::NAN, 0.0, None).is_err());
        assert!(GeoRecord::new("Nowhere", 0.0, f64::INFINITY, None).is_err());
    }

    #[test]
    fn serializes_validated_fields() {
        let geo = GeoRecord::new("Nashik", 19.99, 73.79, Some("India".into())).unwrap();
        let json = serde_json::to_value(&geo).unwrap();
        assert_eq!(json["label"], "Nashik");
        assert_eq!(json["latitude"], 19.99);
        assert_eq!(json["longitude"], 73.79);
        assert_eq!(json["country_label"], "India");
    }

    #[test]
    fn empty_country_is_dropped() {
        let geo = GeoRecord::new("Pune", 18.52, 73.86, Some(String::new())).unwrap();
        assert_eq!(geo.country_label(), None);
    }
}
