use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{LocationInfo, WidgetError, provider::truncate_body};

use super::LocationSource;

pub const IP_API_URL: &str = "https://ipapi.co/json";

/// IP geolocation via ipapi.co. No parameters; the caller's address is the query.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    url: String,
    http: Client,
}

impl IpApiLocator {
    pub fn new(http: Client) -> Self {
        Self::with_url(http, IP_API_URL)
    }

    /// Point the locator at another endpoint (tests, proxies).
    pub fn with_url(http: Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    async fn fetch(&self) -> Result<LocationInfo> {
        tracing::debug!(url = %self.url, "Requesting IP location");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Failed to send request to IP geolocation service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read IP geolocation response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "IP geolocation request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: IpApiResponse =
            serde_json::from_str(&body).context("Failed to parse IP geolocation JSON")?;

        Ok(LocationInfo {
            city: parsed.city,
            country: parsed.country,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: String,
    country: String,
}

#[async_trait]
impl LocationSource for IpApiLocator {
    async fn fetch_location(&self) -> Result<LocationInfo, WidgetError> {
        let location = self
            .fetch()
            .await
            .map_err(|e| WidgetError::LocationUnavailable(format!("{e:#}")))?;

        tracing::debug!(city = %location.city, country = %location.country, "Resolved location");
        Ok(location)
    }
}
