use anyhow::Result;
use reqwest::Client;

use crate::{
    Options, Settings, WeatherObservation, WidgetError,
    config::resolve,
    provider::{
        IpApiLocator, LocationSource, UnavailableSource, WeatherSource, WeatherbitClient,
        http_client,
    },
    render,
    surface::OutputSurface,
};

/// What a single invocation ended up showing.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(WeatherObservation),
    Failed(WidgetError),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }
}

/// One configured widget: options plus the two upstream sources.
#[derive(Debug)]
pub struct WeatherWidget {
    options: Options,
    location: Box<dyn LocationSource>,
    weather: Box<dyn WeatherSource>,
}

impl WeatherWidget {
    /// Widget backed by ipapi.co and Weatherbit.
    ///
    /// If the HTTP client can't be built, both sources report themselves
    /// unavailable and `run` renders the error message.
    pub fn new(options: Options) -> Self {
        Self::with_client(options, http_client())
    }

    fn with_client(options: Options, http: Result<Client>) -> Self {
        match http {
            Ok(http) => Self::with_sources(
                options,
                Box::new(IpApiLocator::new(http.clone())),
                Box::new(WeatherbitClient::new(http)),
            ),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to build HTTP client");
                let source = UnavailableSource::new(format!("HTTP client unavailable: {e:#}"));
                Self::with_sources(options, Box::new(source.clone()), Box::new(source))
            }
        }
    }

    pub fn with_sources(
        options: Options,
        location: Box<dyn LocationSource>,
        weather: Box<dyn WeatherSource>,
    ) -> Self {
        Self {
            options,
            location,
            weather,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Location, then weather. The first failure stops the chain.
    pub async fn fetch(&self, settings: &Settings) -> Result<WeatherObservation, WidgetError> {
        let location = self.location.fetch_location().await?;
        self.weather.fetch_weather(&location, settings).await
    }

    /// Run the whole pipeline once and write the result into `surface`.
    ///
    /// Widget errors are rendered as the configured error message and reported in
    /// the outcome; only a failing surface is returned as `Err`.
    pub async fn run(&self, surface: &mut dyn OutputSurface) -> Result<RenderOutcome> {
        let settings = match resolve(&self.options) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Widget configuration rejected");
                render::render_error_message(
                    self.options.error_message(),
                    self.options.target_selector(),
                    surface,
                )?;
                return Ok(RenderOutcome::Failed(e));
            }
        };

        match self.fetch(&settings).await {
            Ok(observation) => {
                render::render_success(&observation, &settings, surface)?;
                Ok(RenderOutcome::Rendered(observation))
            }
            Err(e) => {
                tracing::warn!(
                    kind = e.kind(),
                    error = %e,
                    "Weather unavailable, rendering error message"
                );
                render::render_error(&settings, surface)?;
                Ok(RenderOutcome::Failed(e))
            }
        }
    }
}
