//! Core library for the `clima` weather app.
//!
//! This crate defines:
//! - The weather model and the OpenWeather wire format
//! - API key sourcing & configuration
//! - The weather manager (URL construction, fetch, parse)
//! - Location providers
//! - A headless controller for the weather screen
//!
//! It is used by `clima-cli`, but the screen controller can drive any
//! [`WeatherView`] implementation.

pub mod config;
pub mod error;
pub mod key;
pub mod location;
pub mod manager;
pub mod model;
pub mod screen;
pub mod wire;

pub use config::Config;
pub use error::{ConfigError, LocationError, WeatherError};
pub use key::{ApiKeyProvider, EnvKey, FileKey, StaticKey, select_key_provider};
pub use location::{AuthorizationStatus, FixedLocator, IpLocator, Locator};
pub use manager::{WeatherManager, WeatherSource};
pub use model::{Condition, Coordinates, Query, WeatherModel};
pub use screen::{ScreenState, Spinner, WeatherScreen, WeatherView};
pub use wire::parse;
