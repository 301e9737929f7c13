use std::{
    io::{self, BufRead},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::{info, warn};
use weather_core::{Config, Layout, WeatherProvider, pipeline, provider_from_config};

use crate::shell;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for one or more cities")]
pub struct Cli {
    /// OpenWeather API key; takes precedence over OPENWEATHER_API_KEY and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Language of weather descriptions, e.g. "pl" or "en".
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Unit system understood by OpenWeather: "metric", "imperial" or "standard".
    #[arg(long, global = true)]
    pub units: Option<String>,

    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print weather for a comma-separated list of cities (default).
    Cities {
        /// e.g. "Warszawa, Kraków"; read from stdin when omitted.
        list: Option<String>,
    },

    /// Show a detailed report for a single city.
    Show {
        city: String,
    },

    /// Interactive lookup shell.
    Shell,

    /// Store the OpenWeather API key (and any --lang/--units given) in the config file.
    Configure,
}

impl Cli {
    pub async fn run(mut self) -> Result<()> {
        let command = self.command.take().unwrap_or(Command::Cities { list: None });

        match command {
            Command::Configure => self.configure(),
            Command::Cities { list } => {
                let provider = self.provider()?;
                print_cities(provider.as_ref(), list).await
            }
            Command::Show { city } => {
                let provider = self.provider()?;
                let report = pipeline::weather_for_city(provider.as_ref(), &city, Layout::Detailed).await;
                println!("{report}");
                Ok(())
            }
            Command::Shell => {
                let provider = self.provider()?;
                shell::run(Arc::from(provider)).await
            }
        }
    }

    fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(lang) = &self.lang {
            config.api.lang = lang.clone();
        }
        if let Some(units) = &self.units {
            config.api.units = units.clone();
        }
        Ok(config)
    }

    fn provider(&self) -> Result<Box<dyn WeatherProvider>> {
        let config = self.config()?;
        let api_key = config.resolve_api_key(self.api_key.as_deref())?;
        provider_from_config(&config, api_key)
    }

    fn configure(&self) -> Result<()> {
        let mut config = self.config()?;

        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => Password::new("OpenWeather API key:")
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_help_message("Create one at https://home.openweathermap.org/api_keys")
                .prompt()
                .context("Failed to read API key")?,
        };

        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key must not be empty");
        }

        config.set_api_key(api_key.to_owned());
        let path = config.save()?;

        info!(path = %path.display(), "Configuration saved");
        println!("Configuration saved to {}", path.display());
        Ok(())
    }
}

async fn print_cities(provider: &dyn WeatherProvider, list: Option<String>) -> Result<()> {
    let input = match list {
        Some(list) => list,
        None => read_city_list()?,
    };

    let cities = pipeline::parse_city_list(&input);
    if cities.is_empty() {
        warn!("No city names given");
        return Ok(());
    }

    let results = pipeline::weather_for_cities(provider, &cities, Layout::Banner).await;
    for report in pipeline::filter_valid(results) {
        println!("{report}");
    }

    Ok(())
}

fn read_city_list() -> Result<String> {
    println!("Podaj miasta oddzielone przecinkami:");

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read city list from stdin")?;

    Ok(line)
}
