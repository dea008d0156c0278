//! hyperlayer - Hyper key layers for Karabiner-Elements
//!
//! Compiles a tree of "Hyper + layer key + target key" bindings into a
//! `karabiner.json` complex modification set.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hyperlayer::cli::{CliError, CliResult, ConfigArgs, GenerateArgs, ValidateArgs};
use hyperlayer::config::Config;
use hyperlayer::constants::APP_NAME;

/// hyperlayer - Hyper key layers for Karabiner-Elements
#[derive(Parser, Debug)]
#[command(name = APP_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile layers and write karabiner.json
    Generate(GenerateArgs),
    /// Validate layers without writing anything
    Validate(ValidateArgs),
    /// Show or initialize configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    Config::load_from(config_path)
        .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

fn run(cli: &Cli, config_path: &Path) -> CliResult<()> {
    match &cli.command {
        Command::Generate(args) => args.execute(&load_config(config_path)?),
        Command::Validate(args) => args.execute(&load_config(config_path)?),
        Command::Config(args) => args.execute(config_path),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_file_path()?,
    };

    if let Err(e) = run(&cli, &config_path) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code.code());
    }

    Ok(())
}
