use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use lookout_core::{ApiClient, Config, ServiceId, UnitSystem};
use tracing::info;

use crate::{
    app::{App, Settings},
    console::Console,
    display::Verbosity,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "lookout", version, about = "Weather, ISS position and crypto prices in your terminal")]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Start with this unit system instead of the configured one.
    #[arg(long, value_name = "imperial|metric")]
    pub units: Option<UnitSystem>,

    /// Start in verbose display mode (all weather fields).
    #[arg(long)]
    pub verbose_output: bool,

    /// Send one throwaway request per service before showing the menu.
    #[arg(long)]
    pub warmup: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (the default).
    Menu,

    /// Store the API key for a service.
    Configure {
        /// Service short name: "openweather" or "coinapi".
        service: String,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Some(Command::Configure { service }) => configure(service),
            Some(Command::ConfigPath) => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
            Some(Command::Menu) | None => self.menu().await,
        }
    }

    async fn menu(&self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let settings = self.initial_settings(&config);

        for id in ServiceId::all() {
            if !config.is_service_configured(*id) {
                println!(
                    "Note: no API key for {id}; run `lookout configure {id}` or set {}.",
                    id.env_var()
                );
            }
        }

        let client = ApiClient::from_config(&config)?;
        if self.warmup {
            info!("warming up connections");
            client.warmup().await;
        }

        let mut app = App::new(&client, Console::stdio(), settings);
        app.run().await
    }

    /// Flags override the config file; both fall back to imperial/brief.
    fn initial_settings(&self, config: &Config) -> Settings {
        Settings {
            units: self.units.unwrap_or_else(|| config.default_units()),
            verbosity: Verbosity::from_flag(self.verbose_output || config.default_verbose()),
        }
    }
}

fn configure(service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;

    // Read the file directly so environment overrides are not persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(|key: &str| {
            if key.trim().is_empty() {
                Ok(inquire::validator::Validation::Invalid("API key cannot be empty".into()))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_service_api_key(id, api_key.trim().to_string());
    config.save_to(&path)?;

    println!("Saved API key for {id} to {}", path.display());
    Ok(())
}
