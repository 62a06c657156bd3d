//! Maps typed lines to controller actions.

use weather_core::UnitSystem;

use crate::controller::Action;

pub const HELP: &str = "\
Commands:
  weather [location]   (w)  fetch current weather; updates the location field if given
  forecast [location]  (f)  show the multi-day forecast
  location <text>      (l)  set the location field
  units <metric|imperial|c|f> (u)
  history              (h)  pick a previous search
  back                 (b)  return to the main view
  help                 (?)
  quit                 (q)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Action>),
    Help,
    Quit,
    /// Blank line; just redraw.
    Nothing,
}

/// Parse a line typed at the main prompt.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let with_location = |action: Action| {
        if rest.is_empty() {
            vec![action]
        } else {
            vec![Action::SetLocation(rest.to_string()), action]
        }
    };

    let command = match word.to_lowercase().as_str() {
        "weather" | "w" => Command::Dispatch(with_location(Action::GetWeather)),
        "forecast" | "f" => Command::Dispatch(with_location(Action::ShowForecast)),
        "location" | "l" => Command::Dispatch(vec![Action::SetLocation(rest.to_string())]),
        "units" | "u" => {
            let units = UnitSystem::try_from(rest).map_err(|e| e.to_string())?;
            Command::Dispatch(vec![Action::SetUnits(units)])
        }
        "history" | "h" => Command::Dispatch(vec![Action::ViewHistory]),
        "back" | "b" => Command::Dispatch(vec![Action::Back]),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type `help` for a list.")),
    };

    Ok(command)
}

/// Parse a line typed while the history picker is open (1-based numbers).
pub fn parse_selection(line: &str, len: usize) -> Result<Action, String> {
    let line = line.trim();
    if line.is_empty() || ["c", "q", "quit"].iter().any(|w| line.eq_ignore_ascii_case(w)) {
        return Ok(Action::CancelHistory);
    }

    match line.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Action::SelectHistory(n - 1)),
        _ => Err(format!("Enter a number between 1 and {len}, or press Enter (or q) to cancel.")),
    }
}
