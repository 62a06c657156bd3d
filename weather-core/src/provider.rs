use crate::{
    Config,
    error::{IconError, WeatherError},
    model::{ForecastEntry, UnitSystem, WeatherResult},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions. All failures are folded into `WeatherResult::Failure`.
    async fn fetch_current(&self, location: &str, units: UnitSystem) -> WeatherResult;

    /// Multi-day forecast in provider order.
    async fn fetch_forecast(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;

    /// Image URL for an icon code. Pure; no request is made.
    fn icon_url(&self, icon_ref: &str) -> String;

    /// Download the icon image bytes.
    async fn fetch_icon(&self, icon_ref: &str) -> Result<Vec<u8>, IconError>;
}

/// Construct the provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: set WEATHER_API_KEY or add `api_key` to the config file."
        )
    })?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.base_url.clone(),
        config.icon_base_url.clone(),
        config.timeout_secs,
    )?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("WEATHER_API_KEY"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.icon_base_url = "http://icons.test/img/".to_string();

        let provider = provider_from_config(&cfg).expect("provider should build");
        assert_eq!(provider.icon_url("10n"), "http://icons.test/img/10n@2x.png");
    }
}
