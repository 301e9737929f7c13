//! Interactive lookup shell.
//!
//! The loop owns all display state. Each request runs on its own detached
//! task, which hands its [`Outcome`] back over a one-shot channel; the task
//! never touches the view.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{InquireError, Text};
use tokio::sync::oneshot;
use tracing::debug;
use weather_core::{Layout, WeatherProvider, format_reading, pipeline};

pub const EMPTY_CITY_WARNING: &str = "Proszę podać nazwę miasta!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Fetching,
    Succeeded,
    Failed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Ready => "Gotowy",
            Status::Fetching => "Pobieranie danych...",
            Status::Succeeded => "Dane pobrane pomyślnie",
            Status::Failed => "Błąd pobierania danych",
        }
    }
}

/// What a finished request reports back to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(String),
    NotFound { city: String },
    Failed(String),
}

impl Outcome {
    fn into_display(self) -> (String, bool) {
        match self {
            Outcome::Found(report) => (report, true),
            Outcome::NotFound { city } => (format!("❌ Nie znaleziono miasta: {city}"), false),
            Outcome::Failed(reason) => (format!("❌ Błąd: {reason}"), false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Fetching { city: String },
}

/// Display surface driven by [`Shell`].
///
/// The terminal loop in [`run`] only prompts while idle, so there
/// `set_request_enabled` has nothing to toggle and a second submit during a
/// fetch cannot happen. Front ends that keep accepting input while a worker
/// runs rely on [`Shell::submit`] ignoring it.
pub trait View {
    fn set_status(&mut self, status: Status);
    fn show_output(&mut self, text: &str, success: bool);
    fn warn(&mut self, message: &str);
    fn set_request_enabled(&mut self, enabled: bool);
}

#[derive(Debug)]
pub struct Shell<V> {
    state: ShellState,
    view: V,
}

impl<V: View> Shell<V> {
    pub fn new(mut view: V) -> Self {
        view.set_status(Status::Ready);
        view.set_request_enabled(true);
        Self {
            state: ShellState::Idle,
            view,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ShellState::Idle
    }

    /// Accept a request; returns the city to look up when one should be started.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        if !self.is_idle() {
            debug!("Ignoring request while another one is in flight");
            return None;
        }

        let city = input.trim();
        if city.is_empty() {
            self.view.warn(EMPTY_CITY_WARNING);
            return None;
        }

        self.view.set_request_enabled(false);
        self.view.set_status(Status::Fetching);
        self.state = ShellState::Fetching {
            city: city.to_owned(),
        };

        Some(city.to_owned())
    }

    pub fn complete(&mut self, outcome: Outcome) {
        if self.is_idle() {
            debug!("Dropping result with no request in flight");
            return;
        }

        let (text, success) = outcome.into_display();
        self.view.show_output(&text, success);
        self.view
            .set_status(if success { Status::Succeeded } else { Status::Failed });
        self.view.set_request_enabled(true);
        self.state = ShellState::Idle;
    }
}

/// Start a detached lookup; the receiver yields its outcome.
fn spawn_lookup(provider: Arc<dyn WeatherProvider>, city: String) -> oneshot::Receiver<Outcome> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = match pipeline::lookup(provider.as_ref(), &city).await {
            Some(reading) => Outcome::Found(format_reading(Some(&reading), Layout::Detailed)),
            None => Outcome::NotFound { city },
        };
        // Receiver only goes away if the shell has already exited.
        let _ = tx.send(outcome);
    });

    rx
}

async fn wait_for(rx: oneshot::Receiver<Outcome>) -> Outcome {
    rx.await
        .unwrap_or_else(|_| Outcome::Failed("zadanie pobierania zakończyło się bez wyniku".into()))
}

/// Prompt for cities and report each lookup until the user cancels the prompt.
pub async fn run(provider: Arc<dyn WeatherProvider>) -> Result<()> {
    let mut shell = Shell::new(TerminalView);

    while let Some(input) = prompt_city().await? {
        let Some(city) = shell.submit(&input) else {
            continue;
        };
        debug!(state = ?shell.state(), "Lookup started");

        let outcome = wait_for(spawn_lookup(Arc::clone(&provider), city)).await;
        shell.complete(outcome);
    }

    Ok(())
}

/// `None` once the user leaves with Esc or Ctrl-C.
async fn prompt_city() -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| {
        Text::new("Podaj miasto:")
            .with_help_message("Enter: pobierz pogodę, Esc: wyjście")
            .prompt()
    })
    .await
    .context("City prompt task failed")?;

    match answer {
        Ok(city) => Ok(Some(city)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city name"),
    }
}

#[derive(Debug)]
struct TerminalView;

impl View for TerminalView {
    fn set_status(&mut self, status: Status) {
        println!("{}", format!("[{}]", status.label()).dimmed());
    }

    fn show_output(&mut self, text: &str, success: bool) {
        if success {
            println!("{text}");
        } else {
            println!("{}", text.red());
        }
    }

    fn warn(&mut self, message: &str) {
        println!("{} {message}", "Ostrzeżenie:".yellow().bold());
    }

    // The prompt is only shown while idle.
    fn set_request_enabled(&mut self, _enabled: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use weather_core::{FetchError, WeatherReading};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Status(Status),
        Output(String, bool),
        Warning(String),
        RequestEnabled(bool),
    }

    #[derive(Debug, Default)]
    struct RecordingView {
        events: Vec<Event>,
    }

    impl View for RecordingView {
        fn set_status(&mut self, status: Status) {
            self.events.push(Event::Status(status));
        }

        fn show_output(&mut self, text: &str, success: bool) {
            self.events.push(Event::Output(text.to_string(), success));
        }

        fn warn(&mut self, message: &str) {
            self.events.push(Event::Warning(message.to_string()));
        }

        fn set_request_enabled(&mut self, enabled: bool) {
            self.events.push(Event::RequestEnabled(enabled));
        }
    }

    fn fresh_shell() -> Shell<RecordingView> {
        let mut shell = Shell::new(RecordingView::default());
        shell.view.events.clear();
        shell
    }

    #[test]
    fn starts_idle_and_ready() {
        let shell = Shell::new(RecordingView::default());

        assert!(shell.is_idle());
        assert_eq!(
            shell.view.events,
            vec![Event::Status(Status::Ready), Event::RequestEnabled(true)]
        );
    }

    #[test]
    fn blank_input_warns_and_stays_idle() {
        let mut shell = fresh_shell();

        assert_eq!(shell.submit("   "), None);

        assert!(shell.is_idle());
        assert_eq!(shell.view.events, vec![Event::Warning(EMPTY_CITY_WARNING.into())]);
    }

    #[test]
    fn submit_moves_to_fetching_and_disables_requests() {
        let mut shell = fresh_shell();

        assert_eq!(shell.submit("  Poznań "), Some("Poznań".to_string()));

        assert_eq!(
            shell.state(),
            &ShellState::Fetching {
                city: "Poznań".into()
            }
        );
        assert_eq!(
            shell.view.events,
            vec![Event::RequestEnabled(false), Event::Status(Status::Fetching)]
        );
    }

    #[test]
    fn second_submit_is_ignored_while_fetching() {
        let mut shell = fresh_shell();
        shell.submit("Poznań");
        shell.view.events.clear();

        assert_eq!(shell.submit("Łódź"), None);
        assert!(shell.view.events.is_empty());
    }

    #[test]
    fn found_outcome_shows_report_and_reenables() {
        let mut shell = fresh_shell();
        shell.submit("Poznań");
        shell.view.events.clear();

        shell.complete(Outcome::Found("report".into()));

        assert!(shell.is_idle());
        assert_eq!(
            shell.view.events,
            vec![
                Event::Output("report".into(), true),
                Event::Status(Status::Succeeded),
                Event::RequestEnabled(true),
            ]
        );
    }

    #[test]
    fn failures_are_reported_in_place_of_output() {
        let mut shell = fresh_shell();

        shell.submit("Atlantyda");
        shell.complete(Outcome::NotFound {
            city: "Atlantyda".into(),
        });
        shell.submit("Poznań");
        shell.complete(Outcome::Failed("boom".into()));

        let outputs: Vec<_> = shell
            .view
            .events
            .iter()
            .filter(|e| matches!(e, Event::Output(..) | Event::Status(Status::Failed)))
            .cloned()
            .collect();
        assert_eq!(
            outputs,
            vec![
                Event::Output("❌ Nie znaleziono miasta: Atlantyda".into(), false),
                Event::Status(Status::Failed),
                Event::Output("❌ Błąd: boom".into(), false),
                Event::Status(Status::Failed),
            ]
        );
        assert!(shell.is_idle());
    }

    #[test]
    fn stray_result_while_idle_is_ignored() {
        let mut shell = fresh_shell();

        shell.complete(Outcome::Found("late".into()));

        assert!(shell.view.events.is_empty());
    }

    #[derive(Debug)]
    enum Stub {
        Sunny,
        Missing,
        Panics,
    }

    #[async_trait]
    impl WeatherProvider for Stub {
        async fn current(&self, city: &str) -> Result<WeatherReading, FetchError> {
            match self {
                Stub::Sunny => Ok(WeatherReading {
                    city: city.to_string(),
                    country: "PL".into(),
                    temperature_c: 25.0,
                    feels_like_c: 26.0,
                    humidity_pct: 40.0,
                    pressure_hpa: 1020.0,
                    description: "bezchmurnie".into(),
                    observed_at: Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap(),
                }),
                Stub::Missing => Err(FetchError::MissingField("name")),
                Stub::Panics => panic!("provider blew up"),
            }
        }
    }

    #[tokio::test]
    async fn worker_reports_formatted_reading() {
        let outcome = wait_for(spawn_lookup(Arc::new(Stub::Sunny), "Sopot".into())).await;

        match outcome {
            Outcome::Found(report) => {
                assert!(report.starts_with("🌤️  POGODA W SOPOT, PL"));
                assert!(report.contains("Pobrano: 2024-07-01 12:00:00 UTC"));
            }
            other => panic!("expected a report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn worker_reports_missing_city() {
        let outcome = wait_for(spawn_lookup(Arc::new(Stub::Missing), "Atlantyda".into())).await;

        assert_eq!(
            outcome,
            Outcome::NotFound {
                city: "Atlantyda".into()
            }
        );
    }

    #[tokio::test]
    async fn crashed_worker_still_yields_failure() {
        let outcome = wait_for(spawn_lookup(Arc::new(Stub::Panics), "Sopot".into())).await;

        assert!(matches!(outcome, Outcome::Failed(_)));
    }
}
