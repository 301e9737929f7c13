use chrono::{DateTime, Utc};

/// Current conditions for one city at fetch time.
///
/// Only ever constructed fully populated; a failed lookup yields no reading at all.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    /// Already capitalized.
    pub description: String,
    pub observed_at: DateTime<Utc>,
}
