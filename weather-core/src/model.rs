use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approximate visitor location as reported by the geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub country: String,
}

/// One current-weather reading, taken from the first element of the API's `data` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city_name: String,
    pub temperature: f64,
    /// Weatherbit icon code, e.g. "c01d".
    pub condition_code: String,
    pub condition_description: String,
    pub observed_at: DateTime<Utc>,
}
