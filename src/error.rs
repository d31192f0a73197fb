use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgriWeatherError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty forecast series: {0}")]
    EmptySeries(String),

    #[error("Device location unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgriWeatherError {
    /// Map a reqwest failure onto the lookup taxonomy. Decode failures mean the
    /// payload was not what we expected; everything else is a transport problem.
    pub fn from_reqwest(service: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgriWeatherError::MalformedResponse(format!("{}: {}", service, err))
        } else if err.is_timeout() {
            AgriWeatherError::Network(format!("{} timed out", service))
        } else {
            AgriWeatherError::Network(format!("{}: {}", service, err))
        }
    }

    /// Text shown to the user when a lookup ends in the failed state.
    pub fn user_message(&self) -> String {
        match self {
            AgriWeatherError::NotFound(_) => "Location not found".to_string(),
            AgriWeatherError::Network(detail) => {
                format!("Unable to reach the weather service ({})", detail)
            }
            AgriWeatherError::MalformedResponse(_) | AgriWeatherError::Json(_) => {
                "The weather service returned an unexpected response".to_string()
            }
            AgriWeatherError::EmptySeries(_) => {
                "No forecast data is available for this location".to_string()
            }
            AgriWeatherError::CapabilityUnavailable(_) => "Geolocation not supported".to_string(),
            AgriWeatherError::PermissionDenied => "Location permission denied".to_string(),
            AgriWeatherError::Config(msg) => format!("Configuration error: {}", msg),
            AgriWeatherError::Io(e) => format!("Unable to fetch weather: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgriWeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_user_message() {
        let err = AgriWeatherError::NotFound("Zzqx123".into());
        assert_eq!(err.user_message(), "Location not found");
        assert_eq!(err.to_string(), "Location not found: Zzqx123");
    }

    #[test]
    fn device_errors_have_descriptive_messages() {
        assert_eq!(
            AgriWeatherError::PermissionDenied.user_message(),
            "Location permission denied"
        );
        assert_eq!(
            AgriWeatherError::CapabilityUnavailable("no coordinates".into()).user_message(),
            "Geolocation not supported"
        );
    }
}
