//! Text rendering. Every function here is a pure function of the view state.

use std::fmt::Write as _;

use weather_core::{Background, CurrentWeather, ForecastEntry, UnitSystem};

use crate::controller::{ICON_PLACEHOLDER, IconSlot, Notice, View, ViewState, WeatherPanel};

const RULE: &str = "----------------------------------------";

pub fn weather_lines(current: &CurrentWeather, units: UnitSystem) -> Vec<String> {
    vec![
        format!("Temperature: {:.2}{}", current.temperature, units.temperature_suffix()),
        format!("Humidity: {}%", current.humidity),
        format!("Wind Speed: {:.2} {}", current.wind_speed, units.speed_suffix()),
        format!("Conditions: {}", current.condition),
    ]
}

/// Single-line form of the weather panel.
pub fn weather_summary(current: &CurrentWeather, units: UnitSystem) -> String {
    weather_lines(current, units).join(", ")
}

pub fn forecast_text(entries: &[ForecastEntry], units: UnitSystem) -> String {
    if entries.is_empty() {
        return "No forecast data available.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = write!(
            out,
            "Date: {}\nTemperature: {:.2}{}\nDescription: {}\n\n",
            entry.timestamp,
            entry.temperature,
            units.temperature_suffix(),
            entry.condition
        );
    }
    out
}

pub fn render(state: &ViewState, background: Background) -> String {
    let mut out = String::new();

    match state.view {
        View::Main => render_main(&mut out, state, background),
        View::Forecast => render_forecast(&mut out, state),
    }

    if state.history_picker_open {
        render_picker(&mut out, state);
    }

    if let Some(notice) = &state.notice {
        let (title, text) = match notice {
            Notice::Error(text) => ("Error", text),
            Notice::Info(text) => ("Info", text),
        };
        let _ = writeln!(out, "[{title}] {text}");
    }

    out
}

fn render_main(out: &mut String, state: &ViewState, background: Background) {
    let _ = writeln!(out, "=== My Weather App ({}, {}) ===", background.label(), background.asset());
    let _ = writeln!(
        out,
        "Location: {}   Units: {}   History: {}",
        if state.location.is_empty() { "<empty>" } else { state.location.as_str() },
        state.units,
        state.history.len()
    );
    let _ = writeln!(out, "{RULE}");

    match &state.weather {
        WeatherPanel::Empty => {
            let _ = writeln!(out, "Enter a location to see the weather.");
        }
        WeatherPanel::Loading { location } => {
            let _ = writeln!(out, "Fetching weather for {location}...");
        }
        WeatherPanel::Ready { location, units, current } => {
            let _ = writeln!(out, "{location} ({:.2}, {:.2})", current.lat, current.lon);
            for line in weather_lines(current, *units) {
                let _ = writeln!(out, "{line}");
            }
        }
        WeatherPanel::Failed { message } => {
            let _ = writeln!(out, "{message}");
        }
    }

    match &state.icon {
        IconSlot::Hidden => {}
        IconSlot::Loading { url } => {
            let _ = writeln!(out, "Icon: loading {url}");
        }
        IconSlot::Loaded { url, size } => {
            let _ = writeln!(out, "Icon: {url} ({size} bytes)");
        }
        IconSlot::Unavailable => {
            let _ = writeln!(out, "{ICON_PLACEHOLDER}");
        }
    }

    if state.forecast_loading {
        let _ = writeln!(out, "Fetching forecast...");
    }

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "[weather <loc>] [forecast <loc>] [history] [units c|f] [help] [quit]"
    );
}

fn render_forecast(out: &mut String, state: &ViewState) {
    match &state.forecast {
        Some(panel) => {
            let _ = writeln!(out, "=== Forecast: {} ({}) ===", panel.location, panel.units);
            out.push_str(&forecast_text(&panel.entries, panel.units));
        }
        None => {
            let _ = writeln!(out, "=== Forecast ===");
        }
    }
    let _ = writeln!(out, "[back]");
}

fn render_picker(out: &mut String, state: &ViewState) {
    let _ = writeln!(out, "Search History:");
    for (i, location) in state.history.entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {location}", i + 1);
    }
    let _ = writeln!(out, "Select a number, or press Enter (or q) to cancel.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ForecastPanel, tests::paris};

    #[test]
    fn summary_matches_metric_layout() {
        assert_eq!(
            weather_summary(&paris(), UnitSystem::Metric),
            "Temperature: 18.50°C, Humidity: 60%, Wind Speed: 3.20 m/s, Conditions: clear sky"
        );
    }

    #[test]
    fn imperial_suffixes() {
        let lines = weather_lines(&paris(), UnitSystem::Imperial);
        assert_eq!(lines[0], "Temperature: 18.50°F");
        assert_eq!(lines[2], "Wind Speed: 3.20 mph");
    }

    #[test]
    fn forecast_text_layout() {
        let entries = vec![
            ForecastEntry {
                timestamp: "2024-05-01 12:00:00".into(),
                temperature: 20.0,
                condition: "few clouds".into(),
            },
            ForecastEntry {
                timestamp: "2024-05-01 15:00:00".into(),
                temperature: 21.256,
                condition: "light rain".into(),
            },
        ];

        assert_eq!(
            forecast_text(&entries, UnitSystem::Metric),
            "Date: 2024-05-01 12:00:00\nTemperature: 20.00°C\nDescription: few clouds\n\n\
             Date: 2024-05-01 15:00:00\nTemperature: 21.26°C\nDescription: light rain\n\n"
        );
    }

    #[test]
    fn main_view_shows_weather_icon_and_notice() {
        let mut state = ViewState::new(UnitSystem::Metric);
        state.location = "Paris,FR".into();
        state.weather = WeatherPanel::Ready {
            location: "Paris,FR".into(),
            units: UnitSystem::Metric,
            current: paris(),
        };
        state.icon = IconSlot::Unavailable;
        state.notice = Some(Notice::Info("hello".into()));

        let frame = render(&state, Background::Morning);

        assert!(frame.contains("morning.jpg"));
        assert!(frame.contains("Temperature: 18.50°C\nHumidity: 60%"));
        assert!(frame.contains(ICON_PLACEHOLDER));
        assert!(frame.contains("[Info] hello"));
    }

    #[test]
    fn forecast_view_and_picker() {
        let mut state = ViewState::new(UnitSystem::Imperial);
        state.view = View::Forecast;
        state.forecast = Some(ForecastPanel {
            location: "Oslo".into(),
            units: UnitSystem::Imperial,
            entries: Vec::new(),
        });
        let frame = render(&state, Background::Evening);
        assert!(frame.contains("=== Forecast: Oslo (imperial) ==="));
        assert!(frame.contains("No forecast data available."));

        let mut state = ViewState::new(UnitSystem::Metric);
        state.history.push("Paris,FR");
        state.history.push("Oslo");
        state.history_picker_open = true;
        let frame = render(&state, Background::Afternoon);
        assert!(frame.contains("  1. Paris,FR\n  2. Oslo\n"));
    }
}
