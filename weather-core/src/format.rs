//! Rendering a [`WeatherReading`] as display text.

use crate::WeatherReading;

/// Returned in place of a report whenever there is no reading to format.
pub const FAILURE_MESSAGE: &str = "Nie udało się pobrać danych pogodowych";

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Compact block framed by rules; used when printing many cities.
    #[default]
    Banner,
    /// Spaced-out report with the observation time; used for single lookups.
    Detailed,
}

/// Format a reading, or the failure sentinel when there is none.
pub fn format_reading(reading: Option<&WeatherReading>, layout: Layout) -> String {
    match reading {
        None => FAILURE_MESSAGE.to_string(),
        Some(r) => match layout {
            Layout::Banner => banner(r),
            Layout::Detailed => detailed(r),
        },
    }
}

fn banner(r: &WeatherReading) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\n\
         🌤️  POGODA W {city}, {country}\n\
         {rule}\n\
         🌡️  Temperatura: {temp}°C (odczuwalna: {feels}°C)\n\
         📝 Opis: {description}\n\
         💧 Wilgotność: {humidity}%\n\
         🔽 Ciśnienie: {pressure} hPa\n\
         {rule}\n",
        city = r.city.to_uppercase(),
        country = r.country,
        temp = r.temperature_c,
        feels = r.feels_like_c,
        description = capitalize(&r.description),
        humidity = r.humidity_pct,
        pressure = r.pressure_hpa,
    )
}

fn detailed(r: &WeatherReading) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "🌤️  POGODA W {city}, {country}\n\
         {rule}\n\
         \n\
         🌡️  Temperatura: {temp}°C\n    \
         (odczuwalna: {feels}°C)\n\
         \n\
         📝 Opis: {description}\n\
         \n\
         💧 Wilgotność: {humidity}%\n\
         \n\
         🔽 Ciśnienie: {pressure} hPa\n\
         \n\
         {rule}\n\
         Pobrano: {observed}\n",
        city = r.city.to_uppercase(),
        country = r.country,
        temp = r.temperature_c,
        feels = r.feels_like_c,
        description = capitalize(&r.description),
        humidity = r.humidity_pct,
        pressure = r.pressure_hpa,
        observed = r.observed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
