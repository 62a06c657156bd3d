//! Binary crate for the `weather-app` terminal client.
//!
//! This crate focuses on:
//! - Parsing launch flags and first-run configuration
//! - The UI state machine (`controller`) and its text rendering (`view`)
//! - The event loop running network effects off the input path (`app`)

use clap::Parser;

mod app;
mod cli;
mod controller;
mod input;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
