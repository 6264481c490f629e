use thiserror::Error;

/// Everything that can send a widget invocation down the error path.
///
/// All variants render identically (the configured error message); the
/// variant only matters for logs and for the host's exit status.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("No API key provided. Set `api_key` in the config file or pass --key.")]
    MissingCredential,

    #[error("Unknown unit system '{0}'. Supported units: M (metric), I (imperial).")]
    InvalidUnits(String),

    #[error("Location lookup failed: {0}")]
    LocationUnavailable(String),

    #[error("Weather lookup failed: {0}")]
    WeatherUnavailable(String),

    #[error("Weather service returned no observations for this location")]
    NoObservationData,
}

impl WidgetError {
    /// Short, stable name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            WidgetError::MissingCredential => "missing_credential",
            WidgetError::InvalidUnits(_) => "invalid_units",
            WidgetError::LocationUnavailable(_) => "location_unavailable",
            WidgetError::WeatherUnavailable(_) => "weather_unavailable",
            WidgetError::NoObservationData => "no_observation_data",
        }
    }

    /// True for errors raised before any network request is issued.
    pub fn is_config_error(&self) -> bool {
        matches!(self, WidgetError::MissingCredential | WidgetError::InvalidUnits(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_flagged() {
        assert!(WidgetError::MissingCredential.is_config_error());
        assert!(WidgetError::InvalidUnits("K".into()).is_config_error());
        assert!(!WidgetError::NoObservationData.is_config_error());
        assert!(!WidgetError::LocationUnavailable("boom".into()).is_config_error());
    }

    #[test]
    fn invalid_units_message_names_the_code() {
        let msg = WidgetError::InvalidUnits("kelvin".into()).to_string();
        assert!(msg.contains("'kelvin'"));
        assert!(msg.contains("M (metric)"));
    }
}
