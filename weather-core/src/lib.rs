//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher with timeouts and bounded retries
//! - Formatting a reading into display text
//! - The multi-city lookup pipeline
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::{ApiConfig, Config, HttpConfig};
pub use error::FetchError;
pub use format::{FAILURE_MESSAGE, Layout, format_reading};
pub use model::WeatherReading;
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
