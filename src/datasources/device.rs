use crate::config::DeviceConfig;
use crate::error::{AgriWeatherError, Result};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of the device's own position
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Result<DevicePosition>;
}

/// Position taken from the `device` section of the config file.
pub struct ConfiguredLocator {
    config: DeviceConfig,
}

impl ConfiguredLocator {
    pub fn new(config: DeviceConfig) -> Self {
        Self { config }
    }

    pub fn is_available(&self) -> bool {
        self.config.enabled && self.config.latitude.is_some() && self.config.longitude.is_some()
    }
}

#[async_trait]
impl DeviceLocator for ConfiguredLocator {
    async fn current_position(&self) -> Result<DevicePosition> {
        if !self.config.enabled {
            return Err(AgriWeatherError::PermissionDenied);
        }

        match (self.config.latitude, self.config.longitude) {
            (Some(latitude), Some(longitude)) => Ok(DevicePosition {
                latitude,
                longitude,
            }),
            _ => Err(AgriWeatherError::CapabilityUnavailable(
                "no device coordinates configured".into(),
            )),
        }
    }
}
