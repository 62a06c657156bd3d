use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Measurement system used both for the provider query and for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the provider's `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Current conditions decoded from a successful provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: String,
    /// Provider icon code, e.g. "01d". Resolve with `WeatherProvider::icon_url`.
    pub icon_ref: String,
    pub lat: f64,
    pub lon: f64,
}

/// Outcome of a current-weather lookup. Every failure path ends up in
/// `Failure` with a message ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Success(CurrentWeather),
    Failure { message: String },
}

impl WeatherResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WeatherResult::Success(_))
    }
}

impl From<Result<CurrentWeather, WeatherError>> for WeatherResult {
    fn from(res: Result<CurrentWeather, WeatherError>) -> Self {
        match res {
            Ok(current) => WeatherResult::Success(current),
            Err(err) => WeatherResult::Failure { message: err.to_string() },
        }
    }
}

/// One step of the multi-day forecast, kept in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider-formatted timestamp (`dt_txt`), e.g. "2024-05-01 12:00:00".
    pub timestamp: String,
    pub temperature: f64,
    pub condition: String,
}
