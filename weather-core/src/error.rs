use reqwest::StatusCode;
use thiserror::Error;

/// Why a lookup produced no reading.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("city name is empty")]
    EmptyCity,

    #[error("request to OpenWeather timed out")]
    Timeout,

    #[error("failed to reach OpenWeather: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("OpenWeather responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed OpenWeather response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("OpenWeather response is missing `{0}`")]
    MissingField(&'static str),
}

impl FetchError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::EmptyCity
            | FetchError::Malformed(_)
            | FetchError::MissingField(_) => false,
        }
    }
}

/// The request URL carries the API key, so it is stripped before the error is kept.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.without_url())
        }
    }
}
