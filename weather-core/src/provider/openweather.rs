use std::{fmt, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{debug, info};

use crate::{ApiConfig, FetchError, HttpConfig, WeatherReading, format::capitalize};

use super::WeatherProvider;

const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    api: ApiConfig,
    endpoint: Url,
    http: Client,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("api", &self.api)
            .field("endpoint", &self.endpoint.as_str())
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, api: ApiConfig, http: &HttpConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&format!("{}/weather", api.base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid OpenWeather base URL: {}", api.base_url))?;

        let client = Client::builder()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            api,
            endpoint,
            http: client,
            max_retries: http.max_retries,
            retry_delay_ms: http.retry_delay_ms,
        })
    }

    /// `.../weather?q={city}&appid={key}&units={units}&lang={lang}`, city percent-encoded.
    pub fn request_url(&self, city: &str) -> Result<Url, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyCity);
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", &self.api_key)
            .append_pair("units", &self.api.units)
            .append_pair("lang", &self.api.lang);

        Ok(url)
    }

    async fn fetch_once(&self, url: Url) -> Result<WeatherReading, FetchError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            info!(%status, "OpenWeather returned a non-200 status");
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        parse_current(&body).inspect_err(|err| info!(error = %err, "Unusable OpenWeather payload"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReading, FetchError> {
        let url = self.request_url(city)?;
        let city = city.trim();

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry_delay_ms)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.max_retries);

        let this = self;
        let mut attempt = 0usize;

        RetryIf::spawn(
            strategy,
            move || {
                attempt += 1;
                debug!(city, attempt, "Requesting current weather");
                this.fetch_once(url.clone())
            },
            |err: &FetchError| {
                let transient = err.is_retryable();
                if transient {
                    info!(city, error = %err, "Transient OpenWeather failure");
                }
                transient
            },
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Extract a reading from a `/weather` body; any missing required field is an error.
fn parse_current(body: &str) -> Result<WeatherReading, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    if parsed.name.trim().is_empty() {
        return Err(FetchError::MissingField("name"));
    }

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or(FetchError::MissingField("weather[0].description"))?;

    let observed_at =
        DateTime::<Utc>::from_timestamp(parsed.dt, 0).ok_or(FetchError::MissingField("dt"))?;

    Ok(WeatherReading {
        city: parsed.name,
        country: parsed.sys.country,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        description: capitalize(&description),
        observed_at,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
