use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{Config, NormalizedWeatherReport, UvIndex, WeatherService};

use crate::server;

/// Location used when `show` is given nothing to look up.
const DEFAULT_CITY: &str = "London";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Serve the weather lookup endpoint over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short, default_value_t = 3000)]
        port: u16,
    },

    /// Show current weather for a city or a coordinate pair.
    Show {
        /// City name, optionally with a country code ("Colombo,LK").
        city: Option<String>,

        /// Latitude; takes precedence over the city when given with --lon.
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<String>,

        /// Longitude.
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<String>,

        /// Print the JSON payload the HTTP endpoint would return.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Serve { host, port } => {
                let service = load_service()?;
                server::start(&host, port, service).await
            }
            Command::Show { city, lat, lon, json } => {
                let service = load_service()?;
                let city = match (&city, &lat) {
                    (None, None) => Some(DEFAULT_CITY.to_string()),
                    _ => city,
                };

                let report = service
                    .lookup(city.as_deref(), lat.as_deref(), lon.as_deref())
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render(&report));
                }
                Ok(())
            }
        }
    }
}

fn load_service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    WeatherService::from_config(&config).context("Failed to initialise weather service")
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn render(report: &NormalizedWeatherReport) -> String {
    let conditions = report
        .weather
        .iter()
        .map(|c| c.description.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let uv = match report.uv {
        UvIndex::Measured(v) => v.to_string(),
        UvIndex::Absent => "n/a".to_string(),
    };

    format!(
        "{}\n  {}\n  Temperature: {:.1}°C\n  Humidity:    {}%\n  Wind:        {:.1} m/s\n  UV index:    {}\n",
        report.name, conditions, report.main.temp, report.main.humidity, report.wind.speed, uv,
    )
}
