use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use raincard_core::{Config, Outcome, SearchState, ViewModel, WeatherService};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "raincard", version, about = "Current weather and rain chance for the rest of the day")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and lookup preferences.
    Configure,

    /// Show the weather card for a city.
    Show {
        /// City name; prompted for when absent.
        city: Option<String>,

        /// Print the view model as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(city, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to remove the stored key")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&api_key);

    config.language = Text::new("Description language:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;

    config.default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    let city = match city {
        Some(city) => city,
        None => Text::new("City:")
            .with_default(&config.default_city)
            .prompt()
            .context("Failed to read city name")?,
    };

    let service = WeatherService::from_config(&config);
    let credential = config.resolve_credential();
    tracing::debug!(%city, language = %config.language, "running weather query");

    let (state, ticket) = SearchState::idle().begin();
    if !json {
        eprintln!("{}", render::loading_line(&city));
    }
    let state = state.complete(ticket, service.execute_query(&city, &credential).await);

    match state.outcome() {
        Outcome::Success(report) => {
            let view = ViewModel::derive(report, Utc::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::card(&view));
            }
            Ok(())
        }
        Outcome::Failure(error) => {
            if json {
                let body = serde_json::json!({ "error": error.to_string(), "code": error.kind() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Err(anyhow::anyhow!(error.clone()))
        }
        Outcome::Idle | Outcome::Loading => Ok(()),
    }
}
