use thiserror::Error;

/// Failures of a provider request. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP 404 from the provider.
    #[error("Error: City not found. Please enter a valid location.")]
    NotFound,

    /// Any other non-success status. `what` names the resource ("weather", "forecast").
    #[error("Error: Unable to fetch {what} data (Code {code})")]
    Provider { what: &'static str, code: u16 },

    /// Network failure, malformed JSON, or a missing field.
    #[error("Exception: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

/// Icon download problems. These never affect the textual weather display.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon request failed with status {0}")]
    Status(u16),

    #[error("icon response was empty")]
    Empty,

    #[error("icon response is not a PNG image")]
    NotAnImage,

    #[error("icon request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for IconError {
    fn from(err: reqwest::Error) -> Self {
        IconError::Transport(err.to_string())
    }
}
