use crate::{LocationInfo, Settings, WeatherObservation, WidgetError};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod ipapi;
pub mod weatherbit;

pub use ipapi::IpApiLocator;
pub use weatherbit::WeatherbitClient;

/// Requests are abandoned after this long; a timeout counts as the stage being unavailable.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves the caller's approximate location.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn fetch_location(&self) -> Result<LocationInfo, WidgetError>;
}

/// Fetches current weather for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(
        &self,
        location: &LocationInfo,
        settings: &Settings,
    ) -> Result<WeatherObservation, WidgetError>;
}

/// Stands in for both sources when they can't be built; every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LocationSource for UnavailableSource {
    async fn fetch_location(&self) -> Result<LocationInfo, WidgetError> {
        Err(WidgetError::LocationUnavailable(self.reason.clone()))
    }
}

#[async_trait]
impl WeatherSource for UnavailableSource {
    async fn fetch_weather(
        &self,
        _location: &LocationInfo,
        _settings: &Settings,
    ) -> Result<WeatherObservation, WidgetError> {
        Err(WidgetError::WeatherUnavailable(self.reason.clone()))
    }
}

/// HTTP client shared by both sources.
pub fn http_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("weather-widget/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
