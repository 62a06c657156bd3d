//! Core library for the `weather-app` terminal client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The `WeatherProvider` abstraction and its OpenWeather implementation
//! - Shared domain models (current conditions, forecast, search history)
//!
//! It holds no UI state; `weather-app` drives it.

pub mod background;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;

pub use background::Background;
pub use config::Config;
pub use error::{IconError, WeatherError};
pub use history::SearchHistory;
pub use model::{CurrentWeather, ForecastEntry, UnitSystem, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
