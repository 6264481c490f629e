use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{LocationInfo, Settings, WeatherObservation, WidgetError, provider::truncate_body};

use super::WeatherSource;

pub const WEATHERBIT_URL: &str = "https://api.weatherbit.io/v2.0/current";

/// Current conditions from the Weatherbit v2 API.
#[derive(Debug, Clone)]
pub struct WeatherbitClient {
    url: String,
    http: Client,
}

/// Failure modes of a single request, before they are mapped onto `WidgetError`.
enum FetchError {
    Failed(anyhow::Error),
    Empty,
}

impl From<anyhow::Error> for FetchError {
    fn from(e: anyhow::Error) -> Self {
        FetchError::Failed(e)
    }
}

impl WeatherbitClient {
    pub fn new(http: Client) -> Self {
        Self::with_url(http, WEATHERBIT_URL)
    }

    pub fn with_url(http: Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    async fn fetch_current(
        &self,
        location: &LocationInfo,
        settings: &Settings,
    ) -> Result<WeatherObservation, FetchError> {
        tracing::debug!(
            city = %location.city,
            country = %location.country,
            units = %settings.unit_system,
            "Requesting current weather"
        );

        // reqwest errors carry the URL, which carries the key.
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("key", settings.api_key.expose()),
                ("units", settings.unit_system.code()),
                ("city", location.city.as_str()),
                ("country", location.country.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow!(e.without_url()))
            .context("Failed to send request to Weatherbit (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| anyhow!(e.without_url()))
            .context("Failed to read Weatherbit current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weatherbit current request failed with status {}: {}",
                status,
                truncate_body(&body),
            )
            .into());
        }

        let parsed: WbCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse Weatherbit current JSON")?;

        let entry = parsed.data.into_iter().next().ok_or(FetchError::Empty)?;

        let observed_at = parse_ob_time(&entry.ob_time).unwrap_or_else(|| {
            tracing::warn!(ob_time = %entry.ob_time, "Unparseable observation time, using now");
            Utc::now()
        });

        Ok(WeatherObservation {
            city_name: entry.city_name,
            temperature: entry.temp,
            condition_code: entry.weather.icon,
            condition_description: entry.weather.description,
            observed_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WbWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct WbObservation {
    city_name: String,
    temp: f64,
    ob_time: String,
    weather: WbWeather,
}

#[derive(Debug, Deserialize)]
struct WbCurrentResponse {
    data: Vec<WbObservation>,
}

#[async_trait]
impl WeatherSource for WeatherbitClient {
    async fn fetch_weather(
        &self,
        location: &LocationInfo,
        settings: &Settings,
    ) -> Result<WeatherObservation, WidgetError> {
        match self.fetch_current(location, settings).await {
            Ok(observation) => Ok(observation),
            Err(FetchError::Empty) => Err(WidgetError::NoObservationData),
            Err(FetchError::Failed(e)) => Err(WidgetError::WeatherUnavailable(format!("{e:#}"))),
        }
    }
}

/// Weatherbit reports `ob_time` as "YYYY-MM-DD HH:MM" in UTC.
fn parse_ob_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .map(|ndt| ndt.and_utc())
}
