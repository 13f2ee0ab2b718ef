use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use clima_core::{
    AuthorizationStatus, Config, Coordinates, IpLocator, Locator, Query, WeatherManager,
    WeatherScreen, WeatherSource, key::API_KEY_ENV, select_key_provider,
};
use inquire::InquireError;
use tracing::{debug, info};

use crate::{
    splash,
    view::{self, TerminalView},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "clima",
    version,
    about = "Current weather for a city or your location"
)]
pub struct Cli {
    /// OpenWeather API key; overrides $OPENWEATHER_API_KEY and the config file.
    /// With `configure`, the key to store.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Path to the config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip the startup animation.
    #[arg(long, global = true)]
    pub no_splash: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    ///
    /// Takes the key from `--api-key`, or prompts for it.
    Configure,

    /// Show the current weather once and exit.
    Show {
        /// City name, e.g. "London".
        city: Option<String>,

        #[arg(
            long,
            requires = "lon",
            allow_negative_numbers = true,
            conflicts_with_all = ["city", "here"]
        )]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Use the approximate location of this machine.
        #[arg(long, conflicts_with = "city")]
        here: bool,
    },

    /// Interactive weather screen (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;
        debug!(path = %config_path.display(), "configuration loaded");

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config, &config_path, self.api_key),
            Command::Show {
                city,
                lat,
                lon,
                here,
            } => {
                let (manager, locator) =
                    build_services(&config, self.api_key, API_KEY_ENV, &config_path)?;
                show(&manager, &locator, city, lat.zip(lon), here).await
            }
            Command::Interactive => {
                let (manager, locator) =
                    build_services(&config, self.api_key, API_KEY_ENV, &config_path)?;
                interactive(manager, locator, &config, self.no_splash).await
            }
        }
    }
}

/// Validate the API key source, then build the weather manager and locator.
///
/// `key_var` names the environment variable consulted after `cli_key`.
fn build_services(
    config: &Config,
    cli_key: Option<String>,
    key_var: &str,
    config_path: &Path,
) -> anyhow::Result<(WeatherManager, IpLocator)> {
    // Fail on a missing key before any service or screen exists.
    let keys = select_key_provider(cli_key, key_var, config_path)?;

    let mut manager = WeatherManager::new(keys);
    if let Some(url) = &config.base_url {
        manager = manager.with_base_url(url);
    }

    let mut locator = IpLocator::new();
    if let Some(url) = &config.location_url {
        locator = locator.with_url(url);
    }

    Ok((manager, locator))
}

fn configure(mut config: Config, path: &Path, key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    if key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(key);
    config.save_to(path)?;

    info!(path = %path.display(), "API key saved");
    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn show(
    manager: &WeatherManager,
    locator: &IpLocator,
    city: Option<String>,
    coords: Option<(f64, f64)>,
    here: bool,
) -> anyhow::Result<()> {
    let query = match (city, coords, here) {
        (Some(city), _, _) if !city.trim().is_empty() => Query::City(city.trim().to_string()),
        (_, Some((lat, lon)), _) => Query::Coordinates(Coordinates::new(lat, lon)),
        (_, _, true) => Query::Coordinates(locator.current_location().await?),
        _ => return Err(anyhow!("Give a city name, --lat/--lon, or --here")),
    };

    let weather = manager.fetch(&query).await?;
    println!("{}", view::format_weather(&weather));
    Ok(())
}

async fn interactive(
    manager: WeatherManager,
    locator: IpLocator,
    config: &Config,
    no_splash: bool,
) -> anyhow::Result<()> {
    if !no_splash {
        splash::play(config.splash_duration(), &mut io::stdout())
            .await
            .context("Failed to draw splash screen")?;
    }

    let terminal = TerminalView::new(io::stdout()).acknowledge_with(view::confirm_dialog);
    let mut screen = WeatherScreen::new(Box::new(manager), Box::new(locator), terminal)
        .with_spinner_min(config.spinner_min_duration());

    let consent = inquire::Confirm::new("Allow clima to use your approximate location?")
        .with_default(true)
        .prompt();
    let status = match consent {
        Ok(true) => AuthorizationStatus::Authorized,
        Ok(false) => AuthorizationStatus::Denied,
        Err(InquireError::OperationInterrupted) => return Ok(()),
        Err(InquireError::NotTTY) => AuthorizationStatus::Restricted,
        Err(_) => AuthorizationStatus::NotDetermined,
    };
    screen.authorization_changed(status).await;
    if screen.view().interrupted() {
        return Ok(());
    }

    loop {
        let input = inquire::Text::new("City:")
            .with_help_message(":here for your location, :quit to exit")
            .prompt();

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        if !handle_input(&mut screen, &input).await {
            break;
        }
    }

    Ok(())
}

/// Feed one line of input to the screen. Returns `false` once the session is over.
async fn handle_input<W: Write>(screen: &mut WeatherScreen<TerminalView<W>>, input: &str) -> bool {
    match input.trim() {
        ":quit" | ":q" => return false,
        ":here" => {
            screen.location_pressed().await;
        }
        text => {
            screen.search(text).await;
        }
    }

    // Ctrl-C at an error dialog ends the session like Ctrl-C at the prompt.
    !screen.view().interrupted()
}
