//! Headless controller for the weather screen.
//!
//! The controller owns the Idle → Loading → result state machine and drives a
//! [`WeatherView`]. Rendering is left to the view implementation.

use std::{error::Error as _, time::Duration};

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::{
    AuthorizationStatus, LocationError, Locator, Query, WeatherError, WeatherModel, WeatherSource,
    config::DEFAULT_SPINNER_MIN_MS,
};

pub const SEARCH_PLACEHOLDER: &str = "Type something";

/// Rendering side of the weather screen.
pub trait WeatherView {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Temperature text, condition icon and city name.
    fn show_weather(&mut self, weather: &WeatherModel);
    /// A dismissible error dialog.
    fn show_error(&mut self, message: &str);
    /// Hint shown in the search field when it is submitted empty.
    fn show_placeholder(&mut self, text: &str);
}

/// Loading indicator that, once started, stays up for at least `min_duration`.
#[derive(Debug, Clone)]
pub struct Spinner {
    min_duration: Duration,
    started: Option<Instant>,
}

impl Spinner {
    pub fn new(min_duration: Duration) -> Self {
        Self {
            min_duration,
            started: None,
        }
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Returns once the minimum visible duration has passed since [`Spinner::start`].
    pub async fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            let elapsed = started.elapsed();
            if elapsed < self.min_duration {
                sleep(self.min_duration - elapsed).await;
            }
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SPINNER_MIN_MS))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Idle,
    Loading,
    Showing(WeatherModel),
    Failed(String),
}

/// Weather screen controller.
///
/// Every trigger takes `&mut self`, so at most one fetch is in flight and the
/// screen always shows the outcome of the latest trigger.
#[derive(Debug)]
pub struct WeatherScreen<V> {
    source: Box<dyn WeatherSource>,
    locator: Box<dyn Locator>,
    view: V,
    spinner: Spinner,
    state: ScreenState,
}

impl<V: WeatherView> WeatherScreen<V> {
    pub fn new(source: Box<dyn WeatherSource>, locator: Box<dyn Locator>, view: V) -> Self {
        Self {
            source,
            locator,
            view,
            spinner: Spinner::default(),
            state: ScreenState::Idle,
        }
    }

    pub fn with_spinner_min(mut self, min_duration: Duration) -> Self {
        self.spinner = Spinner::new(min_duration);
        self
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Search submitted from the text field (button or return key).
    pub async fn search(&mut self, text: &str) -> &ScreenState {
        let city = text.trim();
        if city.is_empty() {
            self.view.show_placeholder(SEARCH_PLACEHOLDER);
            return &self.state;
        }

        self.begin();
        let result = self.source.fetch(&Query::City(city.to_string())).await;
        self.finish(result).await
    }

    /// Current-location button.
    pub async fn location_pressed(&mut self) -> &ScreenState {
        self.begin();
        let result = match self.locator.current_location().await {
            Ok(coords) => {
                debug!(%coords, "location fix");
                self.source.fetch(&Query::Coordinates(coords)).await
            }
            Err(err) => Err(err.into()),
        };
        self.finish(result).await
    }

    /// Location permission changed.
    pub async fn authorization_changed(&mut self, status: AuthorizationStatus) -> &ScreenState {
        match status {
            AuthorizationStatus::Authorized => self.location_pressed().await,
            AuthorizationStatus::Denied => {
                self.report(LocationError::PermissionDenied.into());
                &self.state
            }
            AuthorizationStatus::Restricted => {
                self.report(LocationError::Restricted.into());
                &self.state
            }
            AuthorizationStatus::NotDetermined => &self.state,
        }
    }

    fn begin(&mut self) {
        self.spinner.start();
        self.view.show_loading();
        self.state = ScreenState::Loading;
    }

    /// Waits out the spinner minimum, then hides the spinner and renders the
    /// outcome in one step, so a line-based view never prints a result while
    /// the spinner is still up.
    async fn finish(&mut self, result: Result<WeatherModel, WeatherError>) -> &ScreenState {
        self.spinner.stop().await;
        self.view.hide_loading();

        match result {
            Ok(weather) => {
                self.view.show_weather(&weather);
                self.state = ScreenState::Showing(weather);
            }
            Err(err) => self.report(err),
        }

        &self.state
    }

    fn report(&mut self, err: WeatherError) {
        match err.source() {
            Some(cause) => warn!(error = %err, %cause, "weather request failed"),
            None => warn!(error = %err, "weather request failed"),
        }

        let message = err.to_string();
        self.view.show_error(&message);
        self.state = ScreenState::Failed(message);
    }
}
