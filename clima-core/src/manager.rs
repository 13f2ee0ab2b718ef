use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{ApiKeyProvider, Coordinates, Query, WeatherError, WeatherModel, wire::parse};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Anything that can turn a [`Query`] into current weather.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, query: &Query) -> Result<WeatherModel, WeatherError>;
}

/// Client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherManager {
    http: Client,
    base_url: String,
    keys: Arc<dyn ApiKeyProvider>,
}

impl WeatherManager {
    pub fn new(keys: Arc<dyn ApiKeyProvider>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            keys,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn weather_url(&self) -> Result<String, WeatherError> {
        let api_key = self.keys.api_key()?;
        Ok(format!("{}?appid={}&units=metric", self.base_url, api_key))
    }

    /// Request URL for a city search.
    ///
    /// The name is appended as-is, without percent-encoding.
    pub fn city_url(&self, city_name: &str) -> Result<String, WeatherError> {
        Ok(format!("{}&q={}", self.weather_url()?, city_name))
    }

    pub fn coordinates_url(&self, coords: Coordinates) -> Result<String, WeatherError> {
        let base = self.weather_url()?;
        Ok(format!("{base}&lat={}&lon={}", coords.latitude, coords.longitude))
    }

    pub async fn fetch_weather(&self, city_name: &str) -> Result<WeatherModel, WeatherError> {
        let url = self.city_url(city_name)?;
        self.perform_request(&url).await
    }

    pub async fn fetch_weather_at(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherModel, WeatherError> {
        let url = self.coordinates_url(coords)?;
        self.perform_request(&url).await
    }

    async fn perform_request(&self, url: &str) -> Result<WeatherModel, WeatherError> {
        debug!(url = %redact_key(url), "requesting current weather");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| WeatherError::Transport(err.without_url()))?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|err| WeatherError::Transport(err.without_url()))?;

        if body.is_empty() {
            warn!(%status, "weather response had no body");
            return Err(WeatherError::EmptyResponse);
        }

        match parse(&body) {
            Ok(weather) => {
                info!(
                    city = weather.city_name(),
                    id = weather.condition_id(),
                    "weather updated"
                );
                Ok(weather)
            }
            Err(err) => {
                // The status is logged but not used to classify the failure.
                warn!(%status, body = %truncate_body(&body), "weather response did not decode");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherManager {
    async fn fetch(&self, query: &Query) -> Result<WeatherModel, WeatherError> {
        match query {
            Query::City(name) => self.fetch_weather(name).await,
            Query::Coordinates(coords) => self.fetch_weather_at(*coords).await,
        }
    }
}

fn redact_key(url: &str) -> String {
    let Some(start) = url.find("appid=").map(|i| i + "appid=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}<redacted>{}", &url[..start], &url[end..])
}

fn truncate_body(body: &[u8]) -> String {
    const MAX: usize = 200;
    let text = String::from_utf8_lossy(body);
    let cut = text.char_indices().nth(MAX).map(|(idx, _)| idx);
    match cut {
        Some(idx) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}
