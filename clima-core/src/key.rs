//! Sources for the OpenWeather API key.

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{Config, ConfigError};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Supplies the current API key. Asked once per request.
pub trait ApiKeyProvider: Send + Sync + Debug {
    fn api_key(&self) -> Result<String, ConfigError>;

    /// Where the key comes from, for messages. Never the key itself.
    fn source_name(&self) -> String;
}

/// A key fixed at construction, e.g. from `--api-key`.
#[derive(Clone)]
pub struct StaticKey(String);

impl StaticKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl Debug for StaticKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticKey(<redacted>)")
    }
}

impl ApiKeyProvider for StaticKey {
    fn api_key(&self) -> Result<String, ConfigError> {
        non_empty(&self.0, || self.source_name())
    }

    fn source_name(&self) -> String {
        "the command line".to_string()
    }
}

/// Reads the key from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvKey {
    var: String,
}

impl EnvKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl ApiKeyProvider for EnvKey {
    fn api_key(&self) -> Result<String, ConfigError> {
        let value = std::env::var(&self.var).unwrap_or_default();
        non_empty(&value, || self.source_name())
    }

    fn source_name(&self) -> String {
        format!("${}", self.var)
    }
}

/// Reads `api_key` from the TOML config file on every call.
#[derive(Debug, Clone)]
pub struct FileKey {
    path: PathBuf,
}

impl FileKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ApiKeyProvider for FileKey {
    fn api_key(&self) -> Result<String, ConfigError> {
        let config = Config::load_from(&self.path)?;
        match config.api_key() {
            Some(key) => Ok(key.to_owned()),
            None => Err(ConfigError::MissingApiKey {
                path: self.path.clone(),
            }),
        }
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

fn non_empty(value: &str, source_name: impl FnOnce() -> String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyApiKey {
            source_name: source_name(),
        });
    }
    Ok(trimmed.to_string())
}

/// Pick the key provider for this run and check that it can actually produce a key.
///
/// Precedence: explicit key, then the `env_var` environment variable when it holds a
/// non-blank value, then the config file at `config_path`. Fails before anything
/// else is constructed.
pub fn select_key_provider(
    cli_key: Option<String>,
    env_var: &str,
    config_path: &Path,
) -> Result<Arc<dyn ApiKeyProvider>, ConfigError> {
    let env_value = std::env::var(env_var).unwrap_or_default();

    let provider: Arc<dyn ApiKeyProvider> = if let Some(key) = cli_key {
        Arc::new(StaticKey::new(key))
    } else if !env_value.trim().is_empty() {
        Arc::new(EnvKey::new(env_var))
    } else {
        Arc::new(FileKey::new(config_path))
    };

    provider.api_key()?;
    debug!(source = %provider.source_name(), "API key provider selected");

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET_VAR: &str = "CLIMA_TEST_KEY_THAT_IS_NEVER_SET";

    // Every test that sets a variable uses a name no other test reads.
    fn set_env(var: &str, value: &str) {
        unsafe { std::env::set_var(var, value) };
    }

    fn config_with_key(dir: &tempfile::TempDir, key: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, format!("api_key = \"{key}\"\n")).unwrap();
        path
    }

    #[test]
    fn static_key_is_trimmed() {
        assert_eq!(StaticKey::new(" abc ").api_key().unwrap(), "abc");
    }

    #[test]
    fn static_key_debug_hides_value() {
        let shown = format!("{:?}", StaticKey::new("secret"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn blank_static_key_is_rejected() {
        let err = StaticKey::new("  ").api_key().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyApiKey { .. }));
    }

    #[test]
    fn unset_env_key_is_rejected() {
        let err = EnvKey::new(UNSET_VAR).api_key().unwrap_err();
        assert!(err.to_string().contains(UNSET_VAR));
    }

    #[test]
    fn env_key_reads_variable() {
        let var = "CLIMA_TEST_ENV_KEY_READ";
        set_env(var, " ENV_KEY ");

        let key = EnvKey::new(var).api_key().unwrap();
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn file_key_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_with_key(&dir, "FILE_KEY");

        assert_eq!(FileKey::new(&path).api_key().unwrap(), "FILE_KEY");
    }

    #[test]
    fn cli_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_with_key(&dir, "FROM_FILE");
        let var = "CLIMA_TEST_ENV_LOSES_TO_CLI";
        set_env(var, "FROM_ENV");

        let provider = select_key_provider(Some("CLI".into()), var, &path).unwrap();
        assert_eq!(provider.api_key().unwrap(), "CLI");
    }

    #[test]
    fn env_key_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_with_key(&dir, "FROM_FILE");
        let var = "CLIMA_TEST_ENV_BEATS_FILE";
        set_env(var, "FROM_ENV");

        let provider = select_key_provider(None, var, &path).unwrap();
        assert_eq!(provider.api_key().unwrap(), "FROM_ENV");
        assert_eq!(provider.source_name(), "$CLIMA_TEST_ENV_BEATS_FILE");
    }

    #[test]
    fn blank_env_falls_back_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_with_key(&dir, "FROM_FILE");
        let var = "CLIMA_TEST_ENV_BLANK";
        set_env(var, "  ");

        let provider = select_key_provider(None, var, &path).unwrap();
        assert_eq!(provider.api_key().unwrap(), "FROM_FILE");
    }

    #[test]
    fn falls_back_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_with_key(&dir, "FROM_FILE");

        let provider = select_key_provider(None, UNSET_VAR, &path).unwrap();
        assert_eq!(provider.api_key().unwrap(), "FROM_FILE");
        assert_eq!(provider.source_name(), path.display().to_string());
    }

    #[test]
    fn missing_everywhere_fails_at_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = select_key_provider(None, UNSET_VAR, &path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
        assert!(err.to_string().contains("clima configure"));
    }
}
