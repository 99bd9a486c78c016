use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Select, Text};
use weatherdash_core::{Config, Orchestrator, SearchOutcome, UnitSystem, services_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Current and recent weather for any city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides this).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and preferences.
    Configure,

    /// Show current conditions and past hours for a location.
    Show {
        /// City or location name.
        location: String,

        /// Unit system; defaults to the configured one.
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitSystem>,
    },

    /// Search repeatedly; `:units` toggles units, `:recent` lists searches, `:quit` exits.
    Interactive {
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitSystem>,
    },
}

fn parse_units(value: &str) -> Result<UnitSystem, String> {
    UnitSystem::try_from(value).map_err(|e| e.to_string())
}

/// A line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Search(&'a str),
    ToggleUnits,
    Recent,
    Quit,
    Unknown(&'a str),
}

fn parse_repl_input(line: &str) -> ReplInput<'_> {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" | ":exit" => ReplInput::Quit,
        ":u" | ":units" => ReplInput::ToggleUnits,
        ":r" | ":recent" => ReplInput::Recent,
        cmd if cmd.starts_with(':') => ReplInput::Unknown(cmd),
        // Blank input still goes through the orchestrator so it can report it.
        _ => ReplInput::Search(line),
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, units } => show(&location, units).await,
            Command::Interactive { units } => interactive(units).await,
        }
    }
}

fn build_orchestrator(config: &Config, units: Option<UnitSystem>) -> anyhow::Result<Orchestrator> {
    let services = services_from_config(config)?;
    Ok(Orchestrator::from_services(
        services,
        units.unwrap_or(config.units),
        config.recent.policy(),
    ))
}

fn configure() -> anyhow::Result<()> {
    // Read the file itself so an environment key is not written to disk.
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    config.apply_api_key_override(&api_key);

    let start = UnitSystem::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", UnitSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit selection")?;

    config.recent.move_to_front =
        Confirm::new("Move a repeated search to the top of recent searches?")
            .with_default(config.recent.move_to_front)
            .prompt()
            .context("Failed to read recent-search preference")?;

    if config.api_key().is_none() {
        println!("Warning: no API key stored; set one here or via WEATHER_API_KEY.");
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(location: &str, units: Option<UnitSystem>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let orch = build_orchestrator(&config, units)?;

    orch.submit_search(location).await?;

    print!("{}", render::state(&orch.current_state()));
    if let Some(reason) = orch.history_diagnostic() {
        println!("(past weather unavailable: {reason})");
    }
    Ok(())
}

async fn interactive(units: Option<UnitSystem>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let orch = build_orchestrator(&config, units)?;

    println!("{}", render::state(&orch.current_state()));

    loop {
        let line = match Text::new(&format!("Search city ({}):", orch.unit_system())).prompt() {
            Ok(line) => line,
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse_repl_input(&line) {
            ReplInput::Quit => break,
            ReplInput::ToggleUnits => {
                let unit = orch.toggle_unit_system();
                println!("Switched to {unit}; recent searches cleared. Search again to refresh.");
            }
            ReplInput::Recent => print!("{}", render::recent(&orch.recent_searches())),
            ReplInput::Unknown(cmd) => {
                println!("Unknown command '{cmd}'. Try :units, :recent or :quit.");
            }
            ReplInput::Search(text) => {
                // Errors are already reflected in the state; render it either way.
                if let Ok(SearchOutcome::Superseded) = orch.submit_search(text).await {
                    continue;
                }
                print!("{}", render::state(&orch.current_state()));
                if let Some(reason) = orch.history_diagnostic() {
                    println!("(past weather unavailable: {reason})");
                }
                print!("{}", render::recent(&orch.recent_searches()));
            }
        }
    }

    Ok(())
}
