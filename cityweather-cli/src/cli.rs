use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::Password;

use cityweather_core::{
    CityList, Config, SuggestionFetcher, Theme, WeatherFetcher, daily_forecast_local,
    provider_from_config,
};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "cityweather",
    version,
    about = "Track current weather and 5-day forecasts for cities"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// List up to five cities matching a name.
    Suggest {
        /// Partial city name (at least 3 characters).
        query: String,
    },

    /// Show current weather and the 5-day forecast for one city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Interactive session: search, add, expand and remove cities.
    Track,

    /// Set the colour theme, or toggle it when no value is given.
    Theme {
        /// "light" or "dark".
        theme: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Suggest { query } => {
                let fetcher = SuggestionFetcher::new(provider_from_config(&config)?);
                let suggestions = fetcher.suggest(&query).await;
                print!("{}", render::suggestions(&suggestions, config.theme));
            }
            Command::Show { city } => {
                let fetcher = WeatherFetcher::new(provider_from_config(&config)?);
                let weather = fetcher
                    .fetch_by_name(&city)
                    .await
                    .with_context(|| format!("Could not fetch weather for '{city}'"))?;

                let id = weather.current.city_id;
                let mut list = CityList::new();
                list.add(weather.current, daily_forecast_local(&weather.samples))?;
                list.toggle_expand(id);
                print!("{}", render::city_list(&list, config.theme));
            }
            Command::Track => session::run(config).await?,
            Command::Theme { theme } => {
                config.theme = match theme {
                    Some(name) => Theme::try_from(name.as_str())?,
                    None => config.theme.toggled(),
                };
                config.save()?;
                println!("Theme set to {}", config.theme);
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
