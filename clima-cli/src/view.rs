use std::io::Write;

use clima_core::{WeatherModel, WeatherView};
use inquire::InquireError;
use tracing::debug;

/// Blocks until the user dismisses an error dialog.
pub type Acknowledge = fn(&str) -> Result<bool, InquireError>;

/// One-line rendering: glyph, temperature, city.
pub fn format_weather(weather: &WeatherModel) -> String {
    format!(
        "{} {}C  {}  ({})",
        weather.condition().glyph(),
        weather.temperature_string(),
        weather.city_name(),
        weather.condition().description(),
    )
}

/// Terminal error dialog.
pub fn confirm_dialog(message: &str) -> Result<bool, InquireError> {
    inquire::Confirm::new(message).with_default(true).prompt()
}

/// Renders the weather screen as lines on a terminal.
pub struct TerminalView<W: Write> {
    out: W,
    acknowledge: Option<Acknowledge>,
    interrupted: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            acknowledge: None,
            interrupted: false,
        }
    }

    /// Wait for the user to dismiss each error before continuing.
    pub fn acknowledge_with(mut self, acknowledge: Acknowledge) -> Self {
        self.acknowledge = Some(acknowledge);
        self
    }

    /// Set once the user pressed Ctrl-C at an error dialog.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // A broken terminal has nowhere to report to.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> WeatherView for TerminalView<W> {
    fn show_loading(&mut self) {
        let _ = write!(self.out, "Loading...");
        let _ = self.out.flush();
    }

    fn hide_loading(&mut self) {
        let _ = write!(self.out, "\r\x1b[2K");
        let _ = self.out.flush();
    }

    fn show_weather(&mut self, weather: &WeatherModel) {
        self.line(&format_weather(weather));
    }

    fn show_error(&mut self, message: &str) {
        self.line(&format!("Error: {message}"));

        let Some(acknowledge) = self.acknowledge else {
            return;
        };
        match acknowledge("OK") {
            Ok(_) | Err(InquireError::OperationCanceled) => {}
            Err(InquireError::OperationInterrupted) => self.interrupted = true,
            Err(err) => debug!(error = %err, "error dialog closed without an answer"),
        }
    }

    fn show_placeholder(&mut self, text: &str) {
        self.line(&format!("({text})"));
    }
}
