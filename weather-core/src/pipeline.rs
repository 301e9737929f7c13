//! City name in, display text out.
//!
//! Every failure (blank input, HTTP status, transport, malformed payload) is
//! normalized to an absent reading here, so callers only ever see either a
//! formatted report or [`FAILURE_MESSAGE`].

use tracing::info;

use crate::{FAILURE_MESSAGE, Layout, WeatherProvider, WeatherReading, format_reading};

/// Split a comma-separated list, dropping blank entries.
pub fn parse_city_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Look up one city; `None` on any failure. Blank names never reach the provider.
pub async fn lookup(provider: &dyn WeatherProvider, city: &str) -> Option<WeatherReading> {
    let city = city.trim();
    if city.is_empty() {
        info!("Skipping lookup for blank city name");
        return None;
    }

    match provider.current(city).await {
        Ok(reading) => Some(reading),
        Err(err) => {
            info!(city, error = %err, "Weather lookup failed");
            None
        }
    }
}

pub async fn weather_for_city(provider: &dyn WeatherProvider, city: &str, layout: Layout) -> String {
    let reading = lookup(provider, city).await;
    format_reading(reading.as_ref(), layout)
}

/// One entry per input city, in input order; lookups run one after another.
pub async fn weather_for_cities<S: AsRef<str>>(
    provider: &dyn WeatherProvider,
    cities: &[S],
    layout: Layout,
) -> Vec<String> {
    let mut results = Vec::with_capacity(cities.len());
    for city in cities {
        results.push(weather_for_city(provider, city.as_ref(), layout).await);
    }
    results
}

/// Drop the failure sentinel entries.
pub fn filter_valid(results: Vec<String>) -> Vec<String> {
    results
        .into_iter()
        .filter(|result| result != FAILURE_MESSAGE)
        .collect()
}
