use anyhow::Context;
use asthma_core::{Config, assess, provider_from_config};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::output;

/// Top-level CLI struct. Running without a subcommand performs a check.
#[derive(Debug, Parser)]
#[command(
    name = "asthma-risk",
    version,
    about = "Asthma risk check for current outdoor conditions"
)]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch current conditions and print the risk report (default).
    Check,

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Check) {
            Command::Check => check().await,
            Command::Configure => configure(),
        }
    }
}

async fn check() -> anyhow::Result<()> {
    let config = Config::load()?;
    debug!(location = ?config.location, triggers = ?config.triggers, "configuration loaded");

    let provider = provider_from_config(&config)?;
    let report = assess(provider.as_ref(), &config.location, &config.triggers).await?;

    print!("{}", output::render(&report));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    let path = config.save()?;

    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG` wins
/// over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
