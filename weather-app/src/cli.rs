use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use inquire::Password;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, UnitSystem, provider_from_config};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-app", version, about = "Current weather and forecasts in your terminal")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unit system to start with: metric or imperial.
    #[arg(long, value_parser = parse_units)]
    pub units: Option<UnitSystem>,

    /// Log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_units(value: &str) -> Result<UnitSystem, String> {
    UnitSystem::try_from(value).map_err(|e| e.to_string())
}

fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));

    // stderr, so log lines don't interleave with the frame on stdout
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);

        let config = load_config(self.config.as_deref()).await?;
        let units = self.units.unwrap_or(config.default_units);
        let provider = provider_from_config(&config)?;

        info!(base_url = %config.base_url, %units, "starting");
        App::new(provider, units).run().await
    }
}

/// Load the file config, asking for an API key on first run, then apply env overrides.
async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut file_config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Only the file values get saved; env overrides are applied afterwards.
    if !file_config.clone().with_env_overrides().is_configured() {
        let api_key = tokio::task::spawn_blocking(|| {
            Password::new("OpenWeather API key:")
                .without_confirmation()
                .with_help_message("Stored in the config file; WEATHER_API_KEY overrides it.")
                .prompt()
        })
        .await
        .context("API key prompt task failed")?
        .context("Failed to read API key")?;

        file_config.set_api_key(api_key);

        let saved_to = match path {
            Some(path) => {
                file_config.save_to(path)?;
                path.to_path_buf()
            }
            None => file_config.save()?,
        };
        println!("Saved configuration to {}", saved_to.display());
    }

    Ok(file_config.with_env_overrides())
}
