use crate::error::{AgriWeatherError, Result};
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_location")]
    pub default_location: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default)]
    pub alerts: AlertThresholds,
    #[serde(default)]
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_reverse_geocoding_url")]
    pub reverse_geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            reverse_geocoding_url: default_reverse_geocoding_url(),
            forecast_url: default_forecast_url(),
            language: default_language(),
        }
    }
}

/// Alert trigger points. Each rule fires when the forecast reaches its threshold.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertThresholds {
    #[serde(default = "default_heavy_rain_mm")]
    pub heavy_rain_mm: f64,
    #[serde(default = "default_heatwave_max_c")]
    pub heatwave_max_c: f64,
    #[serde(default = "default_frost_min_c")]
    pub frost_min_c: f64,
    #[serde(default = "default_high_wind_gust_kmh")]
    pub high_wind_gust_kmh: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            heavy_rain_mm: default_heavy_rain_mm(),
            heatwave_max_c: default_heatwave_max_c(),
            frost_min_c: default_frost_min_c(),
            high_wind_gust_kmh: default_high_wind_gust_kmh(),
        }
    }
}

/// Device location capability. `enabled: false` behaves like a denied permission;
/// missing coordinates behave like a device without a location service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            latitude: None,
            longitude: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_location() -> String {
    "Mumbai".into()
}

fn default_forecast_days() -> u32 {
    7
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".into()
}

fn default_reverse_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/reverse".into()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}

fn default_language() -> String {
    "en".into()
}

fn default_heavy_rain_mm() -> f64 {
    20.0
}

fn default_heatwave_max_c() -> f64 {
    40.0
}

fn default_frost_min_c() -> f64 {
    0.0
}

fn default_high_wind_gust_kmh() -> f64 {
    60.0
}

impl Config {
    /// Load from `config_override`, else from the first standard location that
    /// exists. Built-in defaults apply when no file is found.
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(AgriWeatherError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.to_path_buf()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::info!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .map_err(|e| AgriWeatherError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str);

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| AgriWeatherError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        tracing::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(AgriWeatherError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.forecast_days == 0 || self.forecast_days > 16 {
            return Err(AgriWeatherError::Config(
                "forecast_days must be between 1 and 16".into(),
            ));
        }
        if self.device.latitude.is_some() != self.device.longitude.is_some() {
            return Err(AgriWeatherError::Config(
                "device.latitude and device.longitude must be set together".into(),
            ));
        }
        if let (Some(latitude), Some(longitude)) = (self.device.latitude, self.device.longitude) {
            crate::models::validate_coordinates(latitude, longitude).map_err(|_| {
                AgriWeatherError::Config(format!(
                    "device position out of range: ({}, {})",
                    latitude, longitude
                ))
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        let xdg_config = dirs::config_dir()?.join("agriweather").join("config.yaml");
        xdg_config.exists().then_some(xdg_config)
    }

    /// Default path for writing new config files (~/.config/agriweather/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgriWeatherError::Config("Cannot determine config directory".into()))?
            .join("agriweather");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| AgriWeatherError::Config(format!("Input error: {}", e));

        println!();
        println!("Let's set up AgriWeather!");
        println!();

        let defaults = Config::default();

        // --- Lookup ---
        println!("Forecast lookup");
        let default_location: String = Input::new()
            .with_prompt("  Default location")
            .default(defaults.default_location.clone())
            .interact_text()
            .map_err(input_err)?;

        let request_timeout_secs: u64 = Input::new()
            .with_prompt("  Request timeout (seconds)")
            .default(defaults.request_timeout_secs)
            .interact_text()
            .map_err(input_err)?;

        println!();

        // --- Alert thresholds ---
        println!("Alert thresholds");
        let heavy_rain_mm: f64 = Input::new()
            .with_prompt("  Heavy rain, daily total (mm)")
            .default(defaults.alerts.heavy_rain_mm)
            .interact_text()
            .map_err(input_err)?;

        let heatwave_max_c: f64 = Input::new()
            .with_prompt("  Heatwave, daily max (°C)")
            .default(defaults.alerts.heatwave_max_c)
            .interact_text()
            .map_err(input_err)?;

        let frost_min_c: f64 = Input::new()
            .with_prompt("  Frost, daily min (°C)")
            .default(defaults.alerts.frost_min_c)
            .interact_text()
            .map_err(input_err)?;

        let high_wind_gust_kmh: f64 = Input::new()
            .with_prompt("  High wind, gust (km/h)")
            .default(defaults.alerts.high_wind_gust_kmh)
            .interact_text()
            .map_err(input_err)?;

        println!();

        // --- Device location (optional) ---
        println!("Device location");
        let enabled = Confirm::new()
            .with_prompt("  Allow location lookups from this device?")
            .default(true)
            .interact()
            .map_err(input_err)?;

        let (latitude, longitude) = if enabled {
            let latitude: String = Input::new()
                .with_prompt("  Latitude (blank if unknown)")
                .default(String::new())
                .allow_empty(true)
                .interact_text()
                .map_err(input_err)?;
            let longitude: String = Input::new()
                .with_prompt("  Longitude (blank if unknown)")
                .default(String::new())
                .allow_empty(true)
                .interact_text()
                .map_err(input_err)?;
            match (latitude.trim().parse::<f64>(), longitude.trim().parse::<f64>()) {
                (Ok(lat), Ok(lon)) => (Some(lat), Some(lon)),
                _ => (None, None),
            }
        } else {
            (None, None)
        };

        println!();

        let config = Config {
            request_timeout_secs,
            default_location,
            alerts: AlertThresholds {
                heavy_rain_mm,
                heatwave_max_c,
                frost_min_c,
                high_wind_gust_kmh,
            },
            device: DeviceConfig {
                enabled,
                latitude,
                longitude,
            },
            ..defaults
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AgriWeatherError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# AgriWeather Configuration\n# Generated by `agriweather init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(config_path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            request_timeout_secs: default_timeout_secs(),
            default_location: default_location(),
            forecast_days: default_forecast_days(),
            alerts: AlertThresholds::default(),
            device: DeviceConfig::default(),
        }
    }
}
