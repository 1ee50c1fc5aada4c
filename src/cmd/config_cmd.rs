//! `fuzzrank config`: inspect and scaffold configuration.
//!
//! - show: resolved values, or with `--effective` the source of each key
//! - env: FUZZRANK_* variables with their current values
//! - schema: JSON schema for manifests
//! - init: write a `.fuzzrank.yaml` template

use std::fs;
use std::path::Path;

use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use fuzzrank::PrecisionLevel;

use crate::args::FormatArgs;
use crate::config::{
    self, ConfigKey, ENV_VARS, EnvVar, LoadedConfig, MANIFEST_FILE, load_config,
    template_manifest, user_config_path,
};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show resolved configuration
    Show(ShowArgs),

    /// List environment variables and their current values
    Env,

    /// Output JSON schema for manifest validation
    Schema,

    /// Create template manifest file
    Init(InitArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Show each key's value with the source that set it
    #[arg(long)]
    effective: bool,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args)]
struct InitArgs {
    /// Directory to create the manifest in (default: current directory)
    #[arg(default_value = ".")]
    path: String,

    /// Write this precision level uncommented
    #[arg(short = 'p', long, value_name = "LEVEL")]
    precision: Option<PrecisionLevel>,

    /// Overwrite existing manifest
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("cannot get cwd: {}", e))?;

    match args.command {
        ConfigCommand::Show(show_args) => run_show(&cwd, show_args),
        ConfigCommand::Env => run_env(),
        ConfigCommand::Schema => run_schema(),
        ConfigCommand::Init(init_args) => run_init(&cwd, init_args),
    }
}

// ============================================================================
// show
// ============================================================================

#[derive(Serialize)]
struct EffectiveValue {
    key: &'static str,
    value: String,
    source: String,
}

#[derive(Serialize)]
struct EffectiveOutput {
    sources: Vec<String>,
    values: Vec<EffectiveValue>,
}

#[derive(Tabled)]
struct EffectiveRow {
    #[tabled(rename = "KEY")]
    key: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "SOURCE")]
    source: String,
}

fn run_show(cwd: &Path, args: ShowArgs) -> Result<(), String> {
    let loaded = load_config(cwd);

    if !args.effective {
        let yaml = serde_yaml::to_string(&loaded.config)
            .map_err(|e| format!("failed to serialize config: {}", e))?;
        println!("{}", yaml.trim());
        return Ok(());
    }

    let output = effective_output(&loaded);
    match args.format.resolve(&loaded.config) {
        OutputFormat::Pretty => output_effective_pretty(&output),
        OutputFormat::Plain => output_effective_plain(&output),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("failed to serialize: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("failed to serialize: {}", e))?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

fn effective_output(loaded: &LoadedConfig) -> EffectiveOutput {
    EffectiveOutput {
        sources: loaded.sources.iter().map(ToString::to_string).collect(),
        values: ConfigKey::ALL
            .iter()
            .map(|&key| EffectiveValue {
                key: key.path(),
                value: key.effective_value(&loaded.config),
                source: loaded.origin(key).to_string(),
            })
            .collect(),
    }
}

fn output_effective_pretty(output: &EffectiveOutput) {
    println!(
        "{} {}",
        "Sources:".bold(),
        output.sources.join(" → ").dimmed()
    );
    println!();

    let rows: Vec<EffectiveRow> = output
        .values
        .iter()
        .map(|v| EffectiveRow {
            key: v.key,
            value: v.value.clone(),
            source: v.source.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

fn output_effective_plain(output: &EffectiveOutput) {
    for v in &output.values {
        println!("{} | {} | {}", v.key, v.value, v.source);
    }
}

// ============================================================================
// env
// ============================================================================

/// Describe the current value of `var` as `config env` shows it.
fn current_value(var: &EnvVar, value: Option<String>) -> String {
    match value {
        None => "(unset)".to_string(),
        Some(value) => match config::env_overlay(var, &value) {
            Some(Err(e)) => format!("{} (ignored: {})", value, e),
            _ => value,
        },
    }
}

fn run_env() -> Result<(), String> {
    println!("{}", "Environment Variables:".bold());
    println!();

    for var in ENV_VARS {
        println!("  {}", var.name.bold());
        println!("    {}", var.description);
        if let Some(values) = var.values {
            println!("    Values: {}", values);
        }
        println!("    Default: {}", var.default);
        if let Some(key) = var.key {
            println!("    Config path: {}", key.path());
        }
        println!(
            "    Current: {}",
            current_value(var, config::env_string(var.name))
        );
        println!();
    }

    Ok(())
}

fn run_schema() -> Result<(), String> {
    println!("{}", config::json_schema());
    Ok(())
}

// ============================================================================
// init
// ============================================================================

fn run_init(cwd: &Path, args: InitArgs) -> Result<(), String> {
    let target_dir = match args.path.as_str() {
        "." => cwd.to_path_buf(),
        path => cwd.join(path),
    };
    let manifest_path = target_dir.join(MANIFEST_FILE);

    if manifest_path.exists() && !args.force {
        return Err(format!(
            "manifest already exists: {}\nUse --force to overwrite",
            manifest_path.display()
        ));
    }

    fs::create_dir_all(&target_dir)
        .map_err(|e| format!("failed to create {}: {}", target_dir.display(), e))?;
    fs::write(&manifest_path, template_manifest(args.precision))
        .map_err(|e| format!("failed to write {}: {}", manifest_path.display(), e))?;

    println!("Created: {}", manifest_path.display());

    if let Some(user_path) = user_config_path()
        && !user_path.exists()
    {
        println!("Hint: user-wide defaults go in {}", user_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigSource};

    fn precision_var() -> &'static EnvVar {
        ENV_VARS
            .iter()
            .find(|v| v.name == "FUZZRANK_PRECISION")
            .unwrap()
    }

    #[test]
    fn test_current_value() {
        let var = precision_var();
        assert_eq!(current_value(var, None), "(unset)");
        assert_eq!(current_value(var, Some("low".to_string())), "low");
        let shown = current_value(var, Some("max".to_string()));
        assert!(shown.starts_with("max (ignored: invalid precision"));
    }

    #[test]
    fn test_current_value_for_unmapped_var() {
        let var = ENV_VARS.iter().find(|v| v.name == "RUST_LOG").unwrap();
        assert_eq!(current_value(var, Some("debug".to_string())), "debug");
    }

    #[test]
    fn test_effective_output_names_sources() {
        let mut loaded = LoadedConfig::default();
        let mut overlay = Config::default();
        overlay.display.limit = Some(3);
        loaded.layer(&overlay, ConfigSource::EnvVar("FUZZRANK_LIMIT".to_string()));

        let output = effective_output(&loaded);
        assert_eq!(output.sources, vec!["default", "$FUZZRANK_LIMIT"]);
        assert_eq!(output.values.len(), ConfigKey::ALL.len());

        let limit = output
            .values
            .iter()
            .find(|v| v.key == "display.limit")
            .unwrap();
        assert_eq!(limit.value, "3");
        assert_eq!(limit.source, "$FUZZRANK_LIMIT");

        let precision = &output.values[0];
        assert_eq!(precision.key, "matching.precision");
        assert_eq!(precision.source, "default");
    }
}
