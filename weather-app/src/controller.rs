//! Application state machine.
//!
//! The controller owns every piece of UI state. User input arrives as
//! [`Action`]s, network completions as [`Message`]s; both mutate the
//! [`ViewState`] and may return [`Effect`]s for the runtime to execute.
//! The controller itself never touches the network.

use std::sync::Arc;

use tracing::{debug, info, warn};
use weather_core::{
    CurrentWeather, ForecastEntry, IconError, SearchHistory, UnitSystem, WeatherError,
    WeatherProvider, WeatherResult,
};

pub const EMPTY_LOCATION_WEATHER: &str = "Please enter city, country.";
pub const EMPTY_LOCATION_FORECAST: &str = "Please enter a location.";
pub const EMPTY_HISTORY: &str = "No search history available.";
pub const ICON_PLACEHOLDER: &str = "Icon not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    Forecast,
}

/// Modal message shown on top of the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherPanel {
    #[default]
    Empty,
    Loading {
        location: String,
    },
    Ready {
        location: String,
        units: UnitSystem,
        current: CurrentWeather,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IconSlot {
    #[default]
    Hidden,
    Loading {
        url: String,
    },
    Loaded {
        url: String,
        size: usize,
    },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPanel {
    pub location: String,
    pub units: UnitSystem,
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub view: View,
    /// Contents of the location input field.
    pub location: String,
    pub units: UnitSystem,
    pub history: SearchHistory,
    pub weather: WeatherPanel,
    pub icon: IconSlot,
    pub forecast: Option<ForecastPanel>,
    pub forecast_loading: bool,
    pub history_picker_open: bool,
    pub notice: Option<Notice>,
}

impl ViewState {
    pub fn new(units: UnitSystem) -> Self {
        Self {
            view: View::Main,
            location: String::new(),
            units,
            history: SearchHistory::new(),
            weather: WeatherPanel::Empty,
            icon: IconSlot::Hidden,
            forecast: None,
            forecast_loading: false,
            history_picker_open: false,
            notice: None,
        }
    }
}

/// User input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetLocation(String),
    SetUnits(UnitSystem),
    GetWeather,
    ShowForecast,
    Back,
    ViewHistory,
    /// Zero-based index into the search history.
    SelectHistory(usize),
    CancelHistory,
    DismissNotice,
}

/// Work for the runtime. `seq` ties the eventual [`Message`] back to its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCurrent { seq: u64, location: String, units: UnitSystem },
    FetchForecast { seq: u64, location: String, units: UnitSystem },
    FetchIcon { seq: u64, icon_ref: String, url: String },
}

/// Completion of an [`Effect`].
#[derive(Debug)]
pub enum Message {
    CurrentLoaded { seq: u64, result: WeatherResult },
    ForecastLoaded { seq: u64, result: Result<Vec<ForecastEntry>, WeatherError> },
    IconLoaded { seq: u64, result: Result<Vec<u8>, IconError> },
}

#[derive(Debug, Clone)]
struct Request {
    seq: u64,
    location: String,
    units: UnitSystem,
}

#[derive(Debug)]
pub struct Controller {
    state: ViewState,
    provider: Arc<dyn WeatherProvider>,
    next_seq: u64,
    weather_request: Option<Request>,
    forecast_request: Option<Request>,
}

impl Controller {
    /// The provider is only used to resolve icon URLs; requests go out as effects.
    pub fn new(provider: Arc<dyn WeatherProvider>, units: UnitSystem) -> Self {
        Self {
            state: ViewState::new(units),
            provider,
            next_seq: 0,
            weather_request: None,
            forecast_request: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        debug!(?action, view = ?self.state.view, "handling action");

        match (self.state.view, action) {
            (_, Action::DismissNotice) => {
                self.state.notice = None;
                Vec::new()
            }
            (_, Action::Back) => {
                self.state.view = View::Main;
                Vec::new()
            }
            (View::Forecast, action) => {
                debug!(?action, "ignored outside the main view");
                self.state.notice =
                    Some(Notice::Info("Go back to the main view first (type `back`).".into()));
                Vec::new()
            }
            (View::Main, Action::SetLocation(location)) => {
                self.state.location = location;
                Vec::new()
            }
            (View::Main, Action::SetUnits(units)) => {
                self.state.units = units;
                Vec::new()
            }
            (View::Main, Action::GetWeather) => self.get_weather(),
            (View::Main, Action::ShowForecast) => self.show_forecast(),
            (View::Main, Action::ViewHistory) => {
                if self.state.history.is_empty() {
                    self.state.notice = Some(Notice::Info(EMPTY_HISTORY.into()));
                } else {
                    self.state.history_picker_open = true;
                }
                Vec::new()
            }
            (View::Main, Action::SelectHistory(index)) => self.select_history(index),
            (View::Main, Action::CancelHistory) => {
                self.state.history_picker_open = false;
                Vec::new()
            }
        }
    }

    pub fn apply(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::CurrentLoaded { seq, result } => self.current_loaded(seq, result),
            Message::ForecastLoaded { seq, result } => {
                self.forecast_loaded(seq, result);
                Vec::new()
            }
            Message::IconLoaded { seq, result } => {
                self.icon_loaded(seq, result);
                Vec::new()
            }
        }
    }

    fn next_request(&mut self, location: String) -> Request {
        self.next_seq += 1;
        Request { seq: self.next_seq, location, units: self.state.units }
    }

    fn get_weather(&mut self) -> Vec<Effect> {
        let location = self.state.location.trim().to_string();
        if location.is_empty() {
            self.state.notice = Some(Notice::Error(EMPTY_LOCATION_WEATHER.into()));
            return Vec::new();
        }

        // Recorded before the fetch, so failed lookups stay in the history.
        self.state.history.push(location.clone());

        let request = self.next_request(location);
        info!(location = %request.location, units = %request.units, seq = request.seq, "fetching weather");

        self.state.weather = WeatherPanel::Loading { location: request.location.clone() };
        self.state.icon = IconSlot::Hidden;

        let effect = Effect::FetchCurrent {
            seq: request.seq,
            location: request.location.clone(),
            units: request.units,
        };
        self.weather_request = Some(request);
        vec![effect]
    }

    fn show_forecast(&mut self) -> Vec<Effect> {
        let location = self.state.location.trim().to_string();
        if location.is_empty() {
            self.state.notice = Some(Notice::Error(EMPTY_LOCATION_FORECAST.into()));
            return Vec::new();
        }

        let request = self.next_request(location);
        info!(location = %request.location, units = %request.units, seq = request.seq, "fetching forecast");

        self.state.forecast_loading = true;

        let effect = Effect::FetchForecast {
            seq: request.seq,
            location: request.location.clone(),
            units: request.units,
        };
        self.forecast_request = Some(request);
        vec![effect]
    }

    fn select_history(&mut self, index: usize) -> Vec<Effect> {
        if !self.state.history_picker_open {
            return Vec::new();
        }
        self.state.history_picker_open = false;

        match self.state.history.get(index) {
            Some(location) => {
                self.state.location = location.to_string();
                self.get_weather()
            }
            None => {
                self.state.notice =
                    Some(Notice::Error(format!("No history entry number {}.", index + 1)));
                Vec::new()
            }
        }
    }

    fn current_loaded(&mut self, seq: u64, result: WeatherResult) -> Vec<Effect> {
        let Some(request) = self.weather_request.as_ref().filter(|r| r.seq == seq).cloned()
        else {
            debug!(seq, "dropping stale weather result");
            return Vec::new();
        };

        match result {
            WeatherResult::Success(current) => {
                let url = self.provider.icon_url(&current.icon_ref);
                let effect =
                    Effect::FetchIcon { seq, icon_ref: current.icon_ref.clone(), url: url.clone() };

                self.state.weather =
                    WeatherPanel::Ready { location: request.location, units: request.units, current };
                self.state.icon = IconSlot::Loading { url };
                vec![effect]
            }
            WeatherResult::Failure { message } => {
                info!(%message, "weather lookup failed");
                self.state.weather = WeatherPanel::Failed { message };
                self.state.icon = IconSlot::Hidden;
                Vec::new()
            }
        }
    }

    fn forecast_loaded(&mut self, seq: u64, result: Result<Vec<ForecastEntry>, WeatherError>) {
        let Some(request) = self.forecast_request.as_ref().filter(|r| r.seq == seq).cloned()
        else {
            debug!(seq, "dropping stale forecast result");
            return;
        };
        self.forecast_request = None;
        self.state.forecast_loading = false;

        match result {
            Ok(entries) => {
                self.state.forecast =
                    Some(ForecastPanel { location: request.location, units: request.units, entries });
                self.state.history_picker_open = false;
                self.state.view = View::Forecast;
            }
            Err(err) => {
                info!(error = %err, "forecast lookup failed");
                self.state.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    fn icon_loaded(&mut self, seq: u64, result: Result<Vec<u8>, IconError>) {
        if self.weather_request.as_ref().map(|r| r.seq) != Some(seq) {
            debug!(seq, "dropping stale icon");
            return;
        }

        let IconSlot::Loading { url } = &self.state.icon else {
            return;
        };
        let url = url.clone();

        self.state.icon = match result {
            Ok(bytes) => IconSlot::Loaded { url, size: bytes.len() },
            Err(err) => {
                warn!(error = %err, %url, "icon unavailable");
                IconSlot::Unavailable
            }
        };
    }
}
