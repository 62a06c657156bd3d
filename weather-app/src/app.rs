//! Event loop: reads commands from stdin, runs effects as tokio tasks and
//! feeds their completions back into the controller.

use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info, warn};
use weather_core::{Background, UnitSystem, WeatherProvider};

use crate::{
    controller::{Action, Controller, Effect, Message, WeatherPanel},
    input::{self, Command},
    view,
};

/// Run one effect against the provider and produce its completion message.
pub async fn perform(provider: &dyn WeatherProvider, effect: Effect) -> Message {
    match effect {
        Effect::FetchCurrent { seq, location, units } => {
            let result = provider.fetch_current(&location, units).await;
            Message::CurrentLoaded { seq, result }
        }
        Effect::FetchForecast { seq, location, units } => {
            let result = provider.fetch_forecast(&location, units).await;
            Message::ForecastLoaded { seq, result }
        }
        Effect::FetchIcon { seq, icon_ref, url } => {
            debug!(%url, "fetching icon");
            let result = provider.fetch_icon(&icon_ref).await;
            Message::IconLoaded { seq, result }
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct App {
    controller: Controller,
    provider: Arc<dyn WeatherProvider>,
    messages_tx: mpsc::UnboundedSender<Message>,
    messages_rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    pub fn new(provider: Arc<dyn WeatherProvider>, units: UnitSystem) -> Self {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        Self {
            controller: Controller::new(provider.clone(), units),
            provider,
            messages_tx,
            messages_rx,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Drive the loop from any line source until EOF or `quit`.
    async fn run_with<R: AsyncBufRead + Unpin>(&mut self, mut input: R) -> anyhow::Result<()> {
        // Partial reads stay in `buf` if the message branch wins the select.
        let mut buf = Vec::new();
        self.render()?;

        loop {
            tokio::select! {
                read = input.read_until(b'\n', &mut buf) => {
                    if read.context("Failed to read from stdin")? == 0 {
                        info!("stdin closed");
                        break;
                    }
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();
                    if line.contains(char::REPLACEMENT_CHARACTER) {
                        warn!("input line was not valid UTF-8");
                    }
                    if let Flow::Quit = self.on_line(&line) {
                        break;
                    }
                }
                Some(message) = self.messages_rx.recv() => self.on_message(message),
            }

            self.render()?;
        }

        Ok(())
    }

    fn on_line(&mut self, line: &str) -> Flow {
        if self.controller.state().history_picker_open {
            let len = self.controller.state().history.len();
            match input::parse_selection(line, len) {
                Ok(action) => self.handle(action),
                Err(hint) => println!("{hint}"),
            }
            return Flow::Continue;
        }

        match input::parse_command(line) {
            Ok(Command::Dispatch(actions)) => {
                for action in actions {
                    self.handle(action);
                }
            }
            Ok(Command::Help) => println!("{}", input::HELP),
            Ok(Command::Quit) => return Flow::Quit,
            Ok(Command::Nothing) => {}
            Err(hint) => println!("{hint}"),
        }

        Flow::Continue
    }

    fn on_message(&mut self, message: Message) {
        let effects = self.controller.apply(message);

        let weather_arrived = effects.iter().any(|e| matches!(e, Effect::FetchIcon { .. }));
        if let (true, WeatherPanel::Ready { location, units, current }) =
            (weather_arrived, &self.controller.state().weather)
        {
            info!(%location, summary = %view::weather_summary(current, *units), "weather updated");
        }

        self.dispatch(effects);
    }

    fn handle(&mut self, action: Action) {
        let effects = self.controller.handle(action);
        self.dispatch(effects);
    }

    /// Spawn each effect; the loop picks up the result on the message channel.
    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let provider = Arc::clone(&self.provider);
            let tx = self.messages_tx.clone();
            tokio::spawn(async move {
                let message = perform(provider.as_ref(), effect).await;
                // The receiver only goes away on shutdown.
                let _ = tx.send(message);
            });
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let frame = view::render(self.controller.state(), Background::now());

        let mut stdout = io::stdout().lock();
        write!(stdout, "\n{frame}> ").context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;

        // Notices are modal: shown once, then dismissed.
        if self.controller.state().notice.is_some() {
            self.controller.handle(Action::DismissNotice);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{
        IconSlot, View,
        tests::{FakeProvider, paris},
    };
    use weather_core::{ForecastEntry, WeatherResult};

    /// Run every effect to completion, feeding results back, until quiescent.
    async fn settle(controller: &mut Controller, provider: &FakeProvider, effects: Vec<Effect>) {
        let mut pending = effects;
        while let Some(effect) = pending.pop() {
            let message = perform(provider, effect).await;
            pending.extend(controller.apply(message));
        }
    }

    fn fake(current: Option<WeatherResult>, icon_ok: bool) -> Arc<FakeProvider> {
        Arc::new(FakeProvider {
            current: std::sync::Mutex::new(current),
            icon_ok,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn paris_scenario_renders_and_loads_icon() {
        let provider = fake(Some(WeatherResult::Success(paris())), true);
        let mut controller = Controller::new(provider.clone(), UnitSystem::Metric);

        controller.handle(Action::SetLocation("Paris,FR".into()));
        let effects = controller.handle(Action::GetWeather);
        settle(&mut controller, &provider, effects).await;

        let WeatherPanel::Ready { current, units, .. } = &controller.state().weather else {
            panic!("expected weather, got {:?}", controller.state().weather);
        };
        assert_eq!(
            view::weather_summary(current, *units),
            "Temperature: 18.50°C, Humidity: 60%, Wind Speed: 3.20 m/s, Conditions: clear sky"
        );
        assert!(matches!(
            &controller.state().icon,
            IconSlot::Loaded { url, .. } if url.ends_with("/01d@2x.png")
        ));
        assert_eq!(
            *provider.calls.lock().unwrap(),
            ["current:Paris,FR:metric", "icon:01d"]
        );
    }

    #[tokio::test]
    async fn icon_failure_keeps_weather_text() {
        let provider = fake(Some(WeatherResult::Success(paris())), false);
        let mut controller = Controller::new(provider.clone(), UnitSystem::Metric);

        controller.handle(Action::SetLocation("Paris,FR".into()));
        let effects = controller.handle(Action::GetWeather);
        settle(&mut controller, &provider, effects).await;

        assert!(matches!(controller.state().weather, WeatherPanel::Ready { .. }));
        assert_eq!(controller.state().icon, IconSlot::Unavailable);
    }

    #[tokio::test]
    async fn empty_input_issues_no_request() {
        let provider = fake(None, true);
        let mut controller = Controller::new(provider.clone(), UnitSystem::Metric);

        let effects = controller.handle(Action::GetWeather);
        settle(&mut controller, &provider, effects).await;

        assert!(provider.calls.lock().unwrap().is_empty());
        assert!(controller.state().history.is_empty());
        assert!(controller.state().notice.is_some());
    }

    #[tokio::test]
    async fn forecast_round_trip_through_provider() {
        let provider = fake(None, true);
        *provider.forecast.lock().unwrap() = Some(vec![ForecastEntry {
            timestamp: "2024-05-01 12:00:00".into(),
            temperature: 55.4,
            condition: "overcast clouds".into(),
        }]);
        let mut controller = Controller::new(provider.clone(), UnitSystem::Imperial);

        controller.handle(Action::SetLocation("Boston".into()));
        let effects = controller.handle(Action::ShowForecast);
        settle(&mut controller, &provider, effects).await;

        assert_eq!(controller.state().view, View::Forecast);
        assert_eq!(*provider.calls.lock().unwrap(), ["forecast:Boston:imperial"]);

        let frame = view::render(controller.state(), Background::Morning);
        assert!(frame.contains("Temperature: 55.40°F"));
    }

    #[tokio::test]
    async fn app_dispatch_delivers_messages() {
        let provider = fake(Some(WeatherResult::Success(paris())), true);
        let mut app = App::new(provider.clone(), UnitSystem::Metric);

        assert!(matches!(app.on_line("w Paris,FR"), Flow::Continue));

        let message = app.messages_rx.recv().await.expect("weather completion");
        app.on_message(message);
        let message = app.messages_rx.recv().await.expect("icon completion");
        app.controller.apply(message);

        assert!(matches!(app.controller.state().icon, IconSlot::Loaded { .. }));
        assert!(matches!(app.on_line("quit"), Flow::Quit));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let provider = fake(Some(WeatherResult::Success(paris())), true);
        let mut app = App::new(provider.clone(), UnitSystem::Metric);

        let input: &[u8] = b"location Paris\n\xff\xfe oops\nw\nh";
        app.run_with(input).await.expect("loop should end cleanly at EOF");

        assert_eq!(app.controller.state().history.entries(), ["Paris"]);
        assert!(app.controller.state().history_picker_open);
    }
}
