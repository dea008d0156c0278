//! Validation command for layer trees.

use crate::cli::common::{load_layer_source, CliError, CliResult};
use crate::compiler::{CompileError, Expander, LayerCompiler, ValidationReport};
use crate::config::Config;
use crate::models::LayerKeyMap;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Check a layer tree for errors without writing anything
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Layer file (TOML, JSON or YAML); defaults to the configured file or built-in bindings
    #[arg(short, long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

/// One reported problem
#[derive(Serialize, Debug)]
struct ValidationMessage {
    severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    path: Vec<String>,
    message: String,
}

/// Size of the tree and of its compiled output
#[derive(Serialize, Debug)]
struct ValidationSummary {
    source: String,
    layers: usize,
    actions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    manipulators: Option<usize>,
}

/// JSON-serializable validation result
#[derive(Serialize, Debug)]
struct ValidationResponse {
    valid: bool,
    errors: Vec<ValidationMessage>,
    summary: ValidationSummary,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let (layers, source) = load_layer_source(self.layers.as_deref(), config)?;

        let compiler = LayerCompiler::new(config.layer_options());
        let report = compiler.validate(&layers);

        let mut messages: Vec<ValidationMessage> = report
            .errors
            .iter()
            .map(|error| ValidationMessage {
                severity: "error".to_string(),
                kind: Some(
                    match error {
                        CompileError::Structural { .. } => "structural",
                        CompileError::NameCollision { .. } => "name_collision",
                    }
                    .to_string(),
                ),
                path: error.path().to_vec(),
                message: error.to_string(),
            })
            .collect();

        messages.extend(report.warnings.iter().map(|warning| ValidationMessage {
            severity: "warning".to_string(),
            kind: None,
            path: warning.path.clone(),
            message: warning.message.clone(),
        }));

        let manipulators = manipulator_count(&compiler, &layers, &report);

        let response = ValidationResponse {
            valid: report.is_valid(),
            errors: messages,
            summary: ValidationSummary {
                source: source.to_string(),
                layers: layers.layer_count(),
                actions: layers.leaf_count(),
                manipulators,
            },
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }

            println!("\nSummary:");
            println!("  Source:       {}", response.summary.source);
            println!("  Layers:       {}", response.summary.layers);
            println!("  Actions:      {}", response.summary.actions);
            if let Some(count) = response.summary.manipulators {
                println!("  Manipulators: {count}");
            }

            if !report.errors.is_empty() || !report.warnings.is_empty() {
                println!();
                print!("{}", report.format_message());
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict && response.errors.iter().any(|m| m.severity == "warning") {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}

/// Expands an already validated tree to count its manipulators.
fn manipulator_count(
    compiler: &LayerCompiler,
    layers: &LayerKeyMap,
    report: &ValidationReport,
) -> Option<usize> {
    if !report.is_valid() {
        return None;
    }

    let rules = Expander::new(compiler.options()).expand(layers);
    Some(rules.iter().map(|rule| rule.manipulators.len()).sum())
}
