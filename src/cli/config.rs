//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use std::path::Path;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Write a config file with default values
    Init(ConfigInitArgs),
    /// Print the config file location
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write a config file with default values
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand against the config file at `config_path`
    pub fn execute(&self, config_path: &Path) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(config_path),
            ConfigCommand::Init(args) => args.execute(config_path),
            ConfigCommand::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, config_path: &Path) -> CliResult<()> {
        let config = Config::load_from(config_path)
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&config)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            output_human_readable(&config, config_path);
        }

        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self, config_path: &Path) -> CliResult<()> {
        if config_path.exists() && !self.force {
            return Err(CliError::validation(format!(
                "Config file already exists: {} (use --force to overwrite)",
                config_path.display()
            )));
        }

        Config::default()
            .save_to(config_path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("✓ Wrote default configuration to {}", config_path.display());
        Ok(())
    }
}

fn output_human_readable(config: &Config, config_path: &Path) {
    println!("Configuration ({})", config_path.display());
    println!();
    println!("Paths:");
    match &config.paths.layers_file {
        Some(path) => println!("  Layers file:      {}", path.display()),
        None => println!("  Layers file:      (built-in bindings)"),
    }
    println!();
    println!("Output:");
    println!("  Path:             {}", config.output.path.display());
    println!("  Profile:          {}", config.output.profile_name);
    println!("  Show in menu bar: {}", config.output.show_in_menu_bar);
    println!();
    println!("Layers:");
    println!("  Variable prefix:  {}", config.layers.variable_prefix);
    println!("  Hold timeout:     {} ms", config.layers.hold_timeout_ms);
    println!("  Trigger label:    {}", config.layers.trigger_label);
    println!();
    println!("Hyper:");
    println!("  Enabled:          {}", config.hyper.enabled);
    println!("  From key:         {}", config.hyper.from_key);
    println!(
        "  Modifiers:        {}",
        config.hyper.modifiers.as_slice().join(", ")
    );
}
