use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, Dashboard, DashboardSettings, GeolocationConfig, TimeFormat, UnitSystem, UserAction,
    location::resolver_from_config, provider::provider_from_config,
};
use inquire::{CustomType, Password, Select};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::render::render_dashboard;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides applied on top of the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DisplayArgs {
    /// Temperature unit: celsius or fahrenheit.
    #[arg(long)]
    units: Option<UnitSystem>,

    /// Time format: 12h or 24h.
    #[arg(long)]
    time_format: Option<TimeFormat>,

    /// Skip device location lookup for this session.
    #[arg(long)]
    no_location: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Weatherbit API key and display preferences.
    Configure,

    /// Fetch once and print both panels.
    Show {
        /// City name or postal code.
        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Interactive dashboard (default).
    Run {
        #[command(flatten)]
        display: DisplayArgs,
    },
}

const HELP: &str = "Type a city or postal code and press Enter. \
:c Celsius  :f Fahrenheit  :u toggle units  :t toggle time  :clear  :q quit";

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run { display: DisplayArgs::default() }) {
            Command::Configure => configure(),
            Command::Show { search, display } => show(search, display).await,
            Command::Run { display } => interactive(display).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("Weatherbit API key (leave empty to keep current):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    config.units = Select::new("Default units:", vec![UnitSystem::Celsius, UnitSystem::Fahrenheit])
        .prompt()
        .context("Failed to read units")?;

    let mode = Select::new("Current location from:", vec!["ip", "fixed", "disabled"])
        .prompt()
        .context("Failed to read geolocation mode")?;
    config.geolocation = match mode {
        "fixed" => GeolocationConfig::Fixed {
            latitude: CustomType::<f64>::new("Latitude:").prompt()?,
            longitude: CustomType::<f64>::new("Longitude:").prompt()?,
        },
        "disabled" => GeolocationConfig::Disabled,
        _ => GeolocationConfig::Ip { url: None },
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_dashboard(config: &Config, display: &DisplayArgs) -> anyhow::Result<Dashboard> {
    let api_key = config.api_key()?;
    let provider = provider_from_config(config)?;

    let mut settings = DashboardSettings::from(config);
    if let Some(units) = display.units {
        settings.units = units;
    }
    if let Some(time_format) = display.time_format {
        settings.time_format = time_format;
    }

    let mut dashboard = Dashboard::new(Arc::new(provider), api_key, settings);

    if !display.no_location {
        let resolver = resolver_from_config(config)?;
        dashboard.locate_once(Arc::from(resolver));
    }

    Ok(dashboard)
}

async fn show(search: Option<String>, display: DisplayArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    // One-shot output has no keystrokes to debounce.
    config.search_debounce_ms = 0;

    let mut dashboard = build_dashboard(&config, &display)?;
    if let Some(term) = search {
        dashboard.set_search_term(&term);
    }
    dashboard.settle().await;

    print!("{}", render_dashboard(dashboard.state()));
    Ok(())
}

async fn interactive(display: DisplayArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dashboard = build_dashboard(&config, &display)?;

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let action = match lines.next_line().await {
                Ok(Some(line)) => parse_action(&line),
                Ok(None) => UserAction::Quit,
                Err(error) => {
                    tracing::error!(%error, "failed to read stdin");
                    UserAction::Quit
                }
            };
            let quit = action == UserAction::Quit;
            if tx.send(action).await.is_err() || quit {
                break;
            }
        }
    });

    dashboard
        .run(rx, |state| {
            println!("\n{}{HELP}", render_dashboard(state));
        })
        .await;

    Ok(())
}

fn parse_action(line: &str) -> UserAction {
    match line.trim() {
        ":q" | ":quit" => UserAction::Quit,
        ":c" => UserAction::SetUnits(UnitSystem::Celsius),
        ":f" => UserAction::SetUnits(UnitSystem::Fahrenheit),
        ":u" => UserAction::ToggleUnits,
        ":t" => UserAction::ToggleTimeFormat,
        ":clear" => UserAction::Search(String::new()),
        _ => UserAction::Search(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggle_commands() {
        assert_eq!(parse_action(":f"), UserAction::SetUnits(UnitSystem::Fahrenheit));
        assert_eq!(parse_action(" :t "), UserAction::ToggleTimeFormat);
        assert_eq!(parse_action(":q"), UserAction::Quit);
        assert_eq!(parse_action(":clear"), UserAction::Search(String::new()));
    }

    #[test]
    fn other_input_is_a_search_term() {
        assert_eq!(parse_action("New York"), UserAction::Search("New York".into()));
        assert_eq!(parse_action("10001"), UserAction::Search("10001".into()));
    }

    #[test]
    fn cli_parses_show_overrides() {
        let cli = Cli::try_parse_from([
            "weather-dashboard",
            "show",
            "--search",
            "Paris",
            "--units",
            "fahrenheit",
            "--time-format",
            "24h",
            "--no-location",
        ])
        .unwrap();

        let Some(Command::Show { search, display }) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(search.as_deref(), Some("Paris"));
        assert_eq!(display.units, Some(UnitSystem::Fahrenheit));
        assert_eq!(display.time_format, Some(TimeFormat::TwentyFourHour));
        assert!(display.no_location);
    }

    #[test]
    fn no_subcommand_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["weather-dashboard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!(Cli::try_parse_from(["weather-dashboard", "show", "--units", "kelvin"]).is_err());
    }
}
