use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a single weather fetch.
///
/// Exactly one of these, or a [`crate::WeatherModel`], comes back per request.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Network or connectivity failure; the transport's own message is surfaced.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("No data received from server")]
    EmptyResponse,

    /// Raised for any body that does not decode, whatever the real cause was.
    #[error("City not found, please try again")]
    NotFound(#[source] serde_json::Error),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    ApiKey(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Couldn't find your location. Please enable GPS in Settings.")]
    PermissionDenied,

    #[error("Couldn't find your location. Please enable GPS in Settings.")]
    Restricted,

    /// No fix could be obtained. The payload is the cause, kept for logs only.
    #[error("Couldn't find your location. Please check GPS settings.")]
    Unavailable(String),
}

/// Configuration problems detected at startup or when a key provider is asked for a key.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured (looked in {}).\n\
         Hint: run `clima configure` and enter your OpenWeather API key, \
         or set OPENWEATHER_API_KEY.",
        path.display()
    )]
    MissingApiKey { path: PathBuf },

    #[error("API key from {source_name} is empty")]
    EmptyApiKey { source_name: String },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_messages_match_user_facing_text() {
        let empty = WeatherError::EmptyResponse;
        assert_eq!(empty.to_string(), "No data received from server");

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let not_found = WeatherError::NotFound(decode);
        assert_eq!(not_found.to_string(), "City not found, please try again");
    }

    #[test]
    fn location_errors_pass_through_their_message() {
        let err = WeatherError::from(LocationError::Unavailable("timeout".into()));
        assert_eq!(
            err.to_string(),
            "Couldn't find your location. Please check GPS settings."
        );

        let err = WeatherError::from(LocationError::PermissionDenied);
        assert!(err.to_string().contains("enable GPS in Settings"));
    }

    #[test]
    fn missing_key_mentions_path_and_hint() {
        let err = ConfigError::MissingApiKey {
            path: PathBuf::from("/tmp/clima/config.toml"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/clima/config.toml"));
        assert!(msg.contains("Hint: run `clima configure`"));
    }
}
