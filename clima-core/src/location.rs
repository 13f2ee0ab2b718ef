//! Device location, as far as a terminal can know it.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Coordinates, LocationError};

pub const DEFAULT_LOCATION_URL: &str = "http://ip-api.com/json";

/// Whether the user has allowed location lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

/// One best-effort location fix per call.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Locator for FixedLocator {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximate location from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLocation {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpLocator {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            url: DEFAULT_LOCATION_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Locator for IpLocator {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        debug!(url = %self.url, "requesting IP location");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "IP location request failed");
                LocationError::Unavailable(err.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, "IP location request rejected");
            return Err(LocationError::Unavailable(format!("status {status}")));
        }

        let fix: IpLocation = res
            .json()
            .await
            .map_err(|err| LocationError::Unavailable(err.to_string()))?;

        match (fix.status.as_str(), fix.lat, fix.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => {
                let reason = match fix.message {
                    Some(message) => message,
                    None => format!("status {}", fix.status),
                };
                warn!(%reason, "IP location lookup failed");
                Err(LocationError::Unavailable(reason))
            }
        }
    }
}
