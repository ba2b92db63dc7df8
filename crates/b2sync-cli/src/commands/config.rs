//! Config command - View and manage B2Sync configuration
//!
//! Provides the `b2sync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Writes a default configuration file
//! 4. Prints where the configuration file lives

use std::path::Path;

use anyhow::{Context, Result};
use b2sync_core::config::{Config, ValidationError};
use clap::Subcommand;
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
            ConfigCommand::Init { force } => execute_init(config_path, *force, format),
            ConfigCommand::Path => execute_path(config_path, format),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_if_present(config_path)?;

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        let source = if config_path.exists() {
            config_path.display().to_string()
        } else {
            format!("defaults, {} not found", config_path.display())
        };
        formatter.success(&format!("Configuration ({source})"));
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

/// Result of checking a configuration file
#[derive(Debug)]
enum Validation {
    Missing,
    Unparseable(String),
    Checked(Vec<ValidationError>),
}

fn validate_file(config_path: &Path) -> Validation {
    if !config_path.exists() {
        return Validation::Missing;
    }
    match Config::load(config_path) {
        Ok(config) => Validation::Checked(config.validate()),
        Err(e) => Validation::Unparseable(format!("{e:#}")),
    }
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let path = config_path.display().to_string();

    info!(config_path = %path, "Validating configuration");

    match validate_file(config_path) {
        Validation::Missing => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": path,
                    "errors": ["Configuration file not found. Using defaults."],
                }));
            } else {
                formatter.info(&format!("Configuration file not found at {path}"));
                formatter.info("Using default configuration. Run 'b2sync config init' to create one.");
            }
        }
        Validation::Unparseable(e) => {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": path,
                    "errors": [format!("Failed to parse configuration: {e}")],
                }));
            } else {
                formatter.error(&format!("Failed to parse configuration: {e}"));
                formatter.field("File", &path);
            }
        }
        Validation::Checked(errors) => {
            if format.is_json() {
                let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                formatter.print_json(&serde_json::json!({
                    "valid": errors.is_empty(),
                    "config_path": path,
                    "errors": error_strings,
                }));
            } else if errors.is_empty() {
                formatter.success("Configuration is valid");
                formatter.field("File", &path);
            } else {
                formatter.error(&format!(
                    "Configuration has {} error{}:",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                ));
                formatter.field("File", &path);
                formatter.info("");
                for error in &errors {
                    formatter.info(&format!("  {} - {}", error.field, error.message));
                }
            }
        }
    }

    Ok(())
}

/// Writes the default configuration unless a file is already there
fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    Config::default().save(config_path)
}

fn execute_init(config_path: &Path, force: bool, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    init_config(config_path, force)?;
    info!(config_path = %config_path.display(), force, "Wrote default configuration");

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "config_path": config_path.display().to_string(),
        }));
    } else {
        formatter.success(&format!("Wrote {}", config_path.display()));
        formatter.info("Edit sync_pairs to point at your folders and bucket.");
    }
    Ok(())
}

fn execute_path(config_path: &Path, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        get_formatter(format).print_json(&serde_json::json!({
            "config_path": config_path.display().to_string(),
            "exists": config_path.exists(),
        }));
    } else {
        println!("{}", config_path.display());
    }
    Ok(())
}
