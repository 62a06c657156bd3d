use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::{IconError, WeatherError},
    model::{CurrentWeather, ForecastEntry, UnitSystem, WeatherResult},
};

use super::WeatherProvider;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    icon_base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        icon_base_url: String,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            icon_base_url: icon_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET `<base>/<endpoint>?q=..&units=..&appid=..` and return the body of a 200 response.
    async fn get_body(
        &self,
        endpoint: &str,
        what: &'static str,
        location: &str,
        units: UnitSystem,
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("units", units.as_query()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        debug!(%status, endpoint, "provider responded");

        match status {
            StatusCode::OK => Ok(res.text().await?),
            StatusCode::NOT_FOUND => Err(WeatherError::NotFound),
            other => {
                let body = res.text().await.unwrap_or_default();
                warn!(%other, body = %truncate_body(&body), "provider request failed");
                Err(WeatherError::Provider { what, code: other.as_u16() })
            }
        }
    }

    async fn try_fetch_current(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<CurrentWeather, WeatherError> {
        let body = self.get_body("weather", "weather", location, units).await?;
        parse_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_current(&self, location: &str, units: UnitSystem) -> WeatherResult {
        let result = self.try_fetch_current(location, units).await;
        if let Err(err) = &result {
            debug!(error = %err, "current weather lookup failed");
        }
        result.into()
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self.get_body("forecast", "forecast", location, units).await?;
        let entries = parse_forecast(&body)?;
        debug!(count = entries.len(), "forecast parsed");
        Ok(entries)
    }

    fn icon_url(&self, icon_ref: &str) -> String {
        format!("{}/{icon_ref}@2x.png", self.icon_base_url)
    }

    #[instrument(skip(self))]
    async fn fetch_icon(&self, icon_ref: &str) -> Result<Vec<u8>, IconError> {
        let res = self.http.get(self.icon_url(icon_ref)).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(IconError::Status(status.as_u16()));
        }

        let bytes = res.bytes().await?;
        if bytes.is_empty() {
            return Err(IconError::Empty);
        }
        if !bytes.starts_with(PNG_SIGNATURE) {
            return Err(IconError::NotAnImage);
        }

        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn parse_current(body: &str) -> Result<CurrentWeather, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Transport("response contained no weather entry".into()))?;

    Ok(CurrentWeather {
        temperature: parsed.main.temp,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        condition: weather.description,
        icon_ref: weather.icon,
        lat: parsed.coord.lat,
        lon: parsed.coord.lon,
    })
}

fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    parsed
        .list
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let condition = entry
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .ok_or_else(|| {
                    WeatherError::Transport(format!("forecast entry {i} has no weather entry"))
                })?;

            Ok(ForecastEntry { timestamp: entry.dt_txt, temperature: entry.main.temp, condition })
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
