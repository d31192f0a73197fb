//! Forecast session controller.
//!
//! Owns the lookup state machine `Idle -> Resolving -> Fetching -> Ready`, with
//! `Failed` ending any attempt. Every lookup is numbered; a result is written
//! only while its number is still the latest issued, so a slow superseded
//! lookup can never overwrite a newer one.

use crate::config::{AlertThresholds, Config};
use crate::datasources::{
    ConfiguredLocator, DeviceLocator, ForecastFetcher, LocationResolver, OpenMeteoClient,
    OpenMeteoGeocoder,
};
use crate::error::{AgriWeatherError, Result};
use crate::logic::{derive_alerts, slice_rolling_window, summarize};
use crate::models::{
    Alert, CurrentConditions, DailyPoint, ForecastBundle, GeoRecord, HourPoint, SummarySet,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Label used when the device position has no named place nearby
pub const DEVICE_FALLBACK_LABEL: &str = "My location";
const DEVICE_QUERY: &str = "current location";

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything a successful lookup shows
#[derive(Debug, Clone, Serialize)]
pub struct ForecastView {
    pub geo: GeoRecord,
    pub daily: Vec<DailyPoint>,
    pub hourly_window: Vec<HourPoint>,
    pub alerts: Vec<Alert>,
    pub summaries: Option<SummarySet>,
    pub current: Option<CurrentConditions>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Resolving,
    Fetching { geo: GeoRecord },
    Ready(Box<ForecastView>),
    Failed { message: String },
}

/// The view model. Only `ForecastSession` writes it; the UI reads snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub query: String,
    pub sequence: u64,
    pub phase: SessionPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sequence: 0,
            phase: SessionPhase::Idle,
        }
    }
}

impl SessionState {
    pub fn loading(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Resolving | SessionPhase::Fetching { .. }
        )
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn resolved_geo(&self) -> Option<&GeoRecord> {
        match &self.phase {
            SessionPhase::Fetching { geo } => Some(geo),
            SessionPhase::Ready(view) => Some(&view.geo),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&ForecastView> {
        match &self.phase {
            SessionPhase::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn daily(&self) -> &[DailyPoint] {
        self.view().map(|v| v.daily.as_slice()).unwrap_or_default()
    }

    pub fn hourly_window(&self) -> &[HourPoint] {
        self.view()
            .map(|v| v.hourly_window.as_slice())
            .unwrap_or_default()
    }

    pub fn alerts(&self) -> &[Alert] {
        self.view().map(|v| v.alerts.as_slice()).unwrap_or_default()
    }

    pub fn summaries(&self) -> Option<&SummarySet> {
        self.view().and_then(|v| v.summaries.as_ref())
    }
}

pub struct ForecastSession {
    resolver: Arc<dyn LocationResolver>,
    fetcher: Arc<dyn ForecastFetcher>,
    locator: Arc<dyn DeviceLocator>,
    thresholds: AlertThresholds,
    outlook_days: u32,
    device_timeout: Duration,
    clock: Clock,
    latest: AtomicU64,
    state: RwLock<SessionState>,
}

impl ForecastSession {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        fetcher: Arc<dyn ForecastFetcher>,
        locator: Arc<dyn DeviceLocator>,
        config: &Config,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            locator,
            thresholds: config.alerts.clone(),
            outlook_days: config.forecast_days,
            device_timeout: config.request_timeout(),
            clock: Arc::new(Utc::now),
            latest: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Session backed by Open-Meteo and the configured device position
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = Arc::new(OpenMeteoGeocoder::new(config)?);
        let fetcher = Arc::new(OpenMeteoClient::new(config)?);
        let locator = Arc::new(ConfiguredLocator::new(config.device.clone()));
        Ok(Self::new(resolver, fetcher, locator, config))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// True while `sequence` is the newest lookup issued
    pub fn is_current(&self, sequence: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == sequence
    }

    /// Resolve `query` by name, fetch its forecast and publish the result.
    /// Returns the lookup's sequence number.
    pub async fn lookup_by_text(&self, query: &str) -> u64 {
        let sequence = self.begin(query.trim()).await;
        let resolved = self.resolver.resolve_by_name(query).await;
        self.fetch_and_publish(sequence, resolved).await;
        sequence
    }

    /// Same as `lookup_by_text`, starting from the device position. A denied or
    /// missing location capability fails the lookup before any network call.
    pub async fn lookup_by_device(&self) -> u64 {
        let sequence = self.begin(DEVICE_QUERY).await;

        let position = match tokio::time::timeout(
            self.device_timeout,
            self.locator.current_position(),
        )
        .await
        {
            Ok(Ok(position)) => position,
            Ok(Err(e)) => {
                self.fail(sequence, e).await;
                return sequence;
            }
            Err(_) => {
                self.fail(
                    sequence,
                    AgriWeatherError::CapabilityUnavailable("device location timed out".into()),
                )
                .await;
                return sequence;
            }
        };

        if !self.is_current(sequence) {
            tracing::debug!("Lookup #{} superseded while locating device", sequence);
            return sequence;
        }

        let resolved = match self
            .resolver
            .resolve_by_coordinates(position.latitude, position.longitude)
            .await
        {
            Err(AgriWeatherError::NotFound(detail)) => {
                tracing::debug!("{}; using '{}'", detail, DEVICE_FALLBACK_LABEL);
                GeoRecord::new(
                    DEVICE_FALLBACK_LABEL,
                    position.latitude,
                    position.longitude,
                    None,
                )
            }
            other => other,
        };

        self.fetch_and_publish(sequence, resolved).await;
        sequence
    }

    /// Issue a new sequence number and reset the state for it. Holding the
    /// write lock while numbering keeps `state.sequence` monotonic.
    async fn begin(&self, query: &str) -> u64 {
        let mut state = self.state.write().await;
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *state = SessionState {
            query: query.to_string(),
            sequence,
            phase: SessionPhase::Resolving,
        };
        tracing::info!("Lookup #{} started for '{}'", sequence, query);
        sequence
    }

    async fn fetch_and_publish(&self, sequence: u64, resolved: Result<GeoRecord>) {
        let geo = match resolved {
            Ok(geo) => geo,
            Err(e) => {
                self.fail(sequence, e).await;
                return;
            }
        };

        if !self
            .transition(sequence, SessionPhase::Fetching { geo: geo.clone() })
            .await
        {
            return;
        }

        match self.fetcher.fetch_forecast(&geo).await {
            Ok(bundle) => {
                let view = self.build_view(geo, bundle);
                if self
                    .transition(sequence, SessionPhase::Ready(Box::new(view)))
                    .await
                {
                    tracing::info!("Lookup #{} ready", sequence);
                }
            }
            Err(e) => self.fail(sequence, e).await,
        }
    }

    fn build_view(&self, geo: GeoRecord, bundle: ForecastBundle) -> ForecastView {
        let now = (self.clock)();
        let hourly_window = slice_rolling_window(&bundle.hourly, now).to_vec();
        let window_gusts: Vec<Option<f64>> =
            hourly_window.iter().map(|h| h.wind_gust_kmh).collect();

        let alerts = derive_alerts(
            &bundle.daily,
            &window_gusts,
            &self.thresholds,
            self.outlook_days,
        );
        let summaries = summarize(&hourly_window);

        ForecastView {
            geo,
            daily: bundle.daily,
            hourly_window,
            alerts,
            summaries,
            current: bundle.current,
            sunrise: bundle.sunrise,
            sunset: bundle.sunset,
        }
    }

    async fn fail(&self, sequence: u64, err: AgriWeatherError) {
        if self
            .transition(
                sequence,
                SessionPhase::Failed {
                    message: err.user_message(),
                },
            )
            .await
        {
            tracing::info!("Lookup #{} failed: {}", sequence, err);
        }
    }

    /// Apply `phase` if `sequence` is still the state's lookup.
    async fn transition(&self, sequence: u64, phase: SessionPhase) -> bool {
        let mut state = self.state.write().await;
        if state.sequence != sequence {
            tracing::debug!(
                "Discarding result of lookup #{} (current is #{})",
                sequence,
                state.sequence
            );
            return false;
        }
        state.phase = phase;
        true
    }
}
