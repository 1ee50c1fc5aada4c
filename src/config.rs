//! Configuration system for the fuzzrank CLI.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FUZZRANK_*)
//! 3. Project manifests (.fuzzrank.yaml, nearest directory wins)
//! 4. User global (~/.config/fuzzrank/config.yaml)
//! 5. Built-in defaults (lowest priority)
//!
//! Every key remembers which source set it last, so `config show --effective`
//! can explain the value a `rank` call will use. The engine itself holds no
//! configuration: the resolved precision level is passed into every match call.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fuzzrank::PrecisionLevel;

use crate::output::{self, OutputFormat};

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration for the fuzzrank CLI.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Matching settings
    pub matching: MatchingConfig,
    /// Display settings
    pub display: DisplayConfig,
}

/// Matching settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum precision a match must reach (null = regular)
    pub precision: Option<PrecisionLevel>,
}

/// Display settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default output format (null = pretty)
    pub format: Option<OutputFormat>,
    /// Maximum number of ranked results (null = unlimited)
    pub limit: Option<usize>,
    /// Color used to highlight matched chars (null = yellow)
    pub highlight: Option<String>,
}

impl Config {
    /// Effective precision level.
    pub fn precision(&self) -> PrecisionLevel {
        self.matching.precision.unwrap_or_default()
    }

    /// Effective output format before TTY detection.
    pub fn format(&self) -> OutputFormat {
        self.display.format.unwrap_or_default()
    }
}

// ============================================================================
// Config Keys
// ============================================================================

/// A single settable configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    Precision,
    Format,
    Limit,
    Highlight,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Precision,
        ConfigKey::Format,
        ConfigKey::Limit,
        ConfigKey::Highlight,
    ];

    /// Dotted path of the key in a manifest.
    pub fn path(self) -> &'static str {
        match self {
            ConfigKey::Precision => "matching.precision",
            ConfigKey::Format => "display.format",
            ConfigKey::Limit => "display.limit",
            ConfigKey::Highlight => "display.highlight",
        }
    }

    pub fn is_set(self, config: &Config) -> bool {
        match self {
            ConfigKey::Precision => config.matching.precision.is_some(),
            ConfigKey::Format => config.display.format.is_some(),
            ConfigKey::Limit => config.display.limit.is_some(),
            ConfigKey::Highlight => config.display.highlight.is_some(),
        }
    }

    /// Copy this key's value from `from` into `to`.
    fn copy(self, from: &Config, to: &mut Config) {
        match self {
            ConfigKey::Precision => to.matching.precision = from.matching.precision,
            ConfigKey::Format => to.display.format = from.display.format,
            ConfigKey::Limit => to.display.limit = from.display.limit,
            ConfigKey::Highlight => to.display.highlight = from.display.highlight.clone(),
        }
    }

    /// Parse `value` and store it under this key.
    pub fn set_from_str(self, config: &mut Config, value: &str) -> Result<(), String> {
        match self {
            ConfigKey::Precision => config.matching.precision = Some(value.parse()?),
            ConfigKey::Format => {
                config.display.format = Some(OutputFormat::from_str(value.trim(), true)?)
            }
            ConfigKey::Limit => {
                let limit = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| format!("invalid limit '{}': {}", value, e))?;
                config.display.limit = Some(limit);
            }
            ConfigKey::Highlight => config.display.highlight = Some(value.trim().to_string()),
        }
        Ok(())
    }

    /// The value a command will use, defaults filled in.
    pub fn effective_value(self, config: &Config) -> String {
        match self {
            ConfigKey::Precision => {
                let level = config.precision();
                format!("{} (threshold {})", level, level.threshold())
            }
            ConfigKey::Format => config.format().as_str().to_string(),
            ConfigKey::Limit => config
                .display
                .limit
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string()),
            ConfigKey::Highlight => {
                let name = config.display.highlight.as_deref();
                match name {
                    Some(n) if n.parse::<colored::Color>().is_err() => {
                        format!("yellow (unknown color '{}')", n)
                    }
                    _ => format!("{:?}", output::highlight_color(name)).to_lowercase(),
                }
            }
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ============================================================================
// Config Source Tracking
// ============================================================================

/// Source of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default
    Default,
    /// User global config (~/.config/fuzzrank/config.yaml)
    UserGlobal,
    /// Project manifest (.fuzzrank.yaml)
    ProjectManifest(String),
    /// Environment variable
    EnvVar(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::UserGlobal => write!(f, "~/.config/fuzzrank/config.yaml"),
            ConfigSource::ProjectManifest(path) => write!(f, "{}", path),
            ConfigSource::EnvVar(name) => write!(f, "${}", name),
        }
    }
}

/// Merged configuration plus where each value came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The merged configuration
    pub config: Config,
    /// Sources that set at least one key, in order of application
    pub sources: Vec<ConfigSource>,
    origins: BTreeMap<ConfigKey, ConfigSource>,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            sources: vec![ConfigSource::Default],
            origins: BTreeMap::new(),
        }
    }
}

impl LoadedConfig {
    /// Layer `overlay` on top, recording `source` for every key it sets.
    ///
    /// Returns the number of keys the overlay set.
    pub fn layer(&mut self, overlay: &Config, source: ConfigSource) -> usize {
        let mut applied = 0;
        for key in ConfigKey::ALL {
            if key.is_set(overlay) {
                key.copy(overlay, &mut self.config);
                self.origins.insert(key, source.clone());
                applied += 1;
            }
        }
        if applied > 0 && !self.sources.contains(&source) {
            self.sources.push(source);
        }
        applied
    }

    /// The source that last set `key`.
    pub fn origin(&self, key: ConfigKey) -> ConfigSource {
        self.origins
            .get(&key)
            .cloned()
            .unwrap_or(ConfigSource::Default)
    }
}

// ============================================================================
// Environment Variable Registry
// ============================================================================

/// Environment variable definition for documentation.
pub struct EnvVar {
    /// Variable name (e.g., "FUZZRANK_FORMAT")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Default value or behavior
    pub default: &'static str,
    /// Config key this maps to, if any
    pub key: Option<ConfigKey>,
    /// Valid values (if enumerable)
    pub values: Option<&'static str>,
}

/// Registry of all supported environment variables.
pub const ENV_VARS: &[EnvVar] = &[
    EnvVar {
        name: "FUZZRANK_PRECISION",
        description: "Minimum precision a match must reach",
        default: "regular",
        key: Some(ConfigKey::Precision),
        values: Some("none, low, regular"),
    },
    EnvVar {
        name: "FUZZRANK_FORMAT",
        description: "Default output format",
        default: "pretty (auto-detects TTY)",
        key: Some(ConfigKey::Format),
        values: Some("pretty, plain, json, yaml"),
    },
    EnvVar {
        name: "FUZZRANK_LIMIT",
        description: "Maximum number of ranked results",
        default: "unlimited",
        key: Some(ConfigKey::Limit),
        values: Some("number"),
    },
    EnvVar {
        name: "NO_COLOR",
        description: "Disable colored output and match highlighting",
        default: "unset",
        key: None,
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "RUST_LOG",
        description: "Log filter for diagnostics on stderr",
        default: "fuzzrank=warn (fuzzrank=debug with --verbose)",
        key: None,
        values: Some("tracing EnvFilter directives"),
    },
];

/// Read an environment variable, treating empty values as unset.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parse an environment value for `var` into a one-key overlay.
///
/// Returns None for variables that don't map to a config key.
pub fn env_overlay(var: &EnvVar, value: &str) -> Option<Result<Config, String>> {
    let key = var.key?;
    let mut overlay = Config::default();
    Some(key.set_from_str(&mut overlay, value).map(|()| overlay))
}

/// Apply FUZZRANK_* overrides using `lookup` to read variables.
///
/// Invalid values are ignored with a warning.
pub fn apply_env<F>(loaded: &mut LoadedConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for var in ENV_VARS {
        let Some(value) = lookup(var.name) else {
            continue;
        };
        match env_overlay(var, &value) {
            Some(Ok(overlay)) => {
                loaded.layer(&overlay, ConfigSource::EnvVar(var.name.to_string()));
            }
            Some(Err(e)) => warn!("ignoring {}: {}", var.name, e),
            None => {}
        }
    }
}

// ============================================================================
// Config Loading
// ============================================================================

/// Project manifest file name.
pub const MANIFEST_FILE: &str = ".fuzzrank.yaml";

/// Load configuration from all sources except CLI flags.
pub fn load_config(cwd: &Path) -> LoadedConfig {
    let mut loaded = LoadedConfig::default();

    if let Some(path) = user_config_path()
        && let Some(user_config) = load_manifest(&path)
    {
        loaded.layer(&user_config, ConfigSource::UserGlobal);
    }

    // Outermost first so the nearest manifest wins
    for path in collect_manifest_paths(cwd) {
        if let Some(manifest) = load_manifest(&path) {
            loaded.layer(&manifest, ConfigSource::ProjectManifest(path.display().to_string()));
        }
    }

    apply_env(&mut loaded, env_string);

    debug!(
        sources = loaded.sources.len(),
        precision = %loaded.config.precision(),
        precision_from = %loaded.origin(ConfigKey::Precision),
        "loaded config"
    );
    loaded
}

/// Get the user config file path (~/.config/fuzzrank/config.yaml).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fuzzrank").join("config.yaml"))
}

/// Load a manifest file.
///
/// Returns None if it doesn't exist; logs a warning and returns None if it
/// can't be parsed.
pub fn load_manifest(path: &Path) -> Option<Config> {
    let content = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// Manifest paths from the filesystem root down to `cwd` (inclusive).
fn collect_manifest_paths(cwd: &Path) -> Vec<PathBuf> {
    let cwd = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    let mut paths: Vec<PathBuf> = cwd
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .filter(|p| p.is_file())
        .collect();
    paths.reverse();
    paths
}

/// Generate JSON schema for the config.
pub fn json_schema() -> String {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

/// Generate a manifest template.
///
/// With `precision` set the matching section is written out uncommented.
pub fn template_manifest(precision: Option<PrecisionLevel>) -> String {
    let matching = match precision {
        Some(level) => format!("matching:\n  precision: {}  # none, low, regular\n", level),
        None => "# matching:\n#   precision: regular  # none, low, regular\n".to_string(),
    };
    format!(
        "# fuzzrank configuration manifest\n\
         # Place in {} (project) or ~/.config/fuzzrank/config.yaml (user)\n\
         \n\
         # Matching settings\n\
         {}\
         \n\
         # Display settings\n\
         # display:\n\
         #   format: pretty      # pretty, plain, json, yaml\n\
         #   limit: null         # null = unlimited\n\
         #   highlight: yellow   # color for matched chars\n",
        MANIFEST_FILE, matching
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn manifest(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.precision(), PrecisionLevel::Regular);
        assert_eq!(config.format(), OutputFormat::Pretty);
        assert_eq!(config.display.limit, None);
    }

    #[test]
    fn test_parse_manifest() {
        let config = manifest("matching:\n  precision: low\ndisplay:\n  limit: 5\n  highlight: cyan\n");
        assert_eq!(config.precision(), PrecisionLevel::Low);
        assert_eq!(config.display.limit, Some(5));
        assert_eq!(config.display.highlight.as_deref(), Some("cyan"));
    }

    #[test]
    fn test_parse_rejects_unknown_precision() {
        assert!(serde_yaml::from_str::<Config>("matching:\n  precision: strict\n").is_err());
    }

    #[test]
    fn test_layer_tracks_origin_per_key() {
        let mut loaded = LoadedConfig::default();
        loaded.layer(
            &manifest("matching:\n  precision: none\ndisplay:\n  limit: 7\n"),
            ConfigSource::UserGlobal,
        );
        let project = ConfigSource::ProjectManifest("/p/.fuzzrank.yaml".to_string());
        loaded.layer(&manifest("matching:\n  precision: low\n"), project.clone());

        assert_eq!(loaded.config.precision(), PrecisionLevel::Low);
        assert_eq!(loaded.config.display.limit, Some(7));
        assert_eq!(loaded.origin(ConfigKey::Precision), project);
        assert_eq!(loaded.origin(ConfigKey::Limit), ConfigSource::UserGlobal);
        assert_eq!(loaded.origin(ConfigKey::Format), ConfigSource::Default);
        assert_eq!(
            loaded.sources,
            vec![ConfigSource::Default, ConfigSource::UserGlobal, project]
        );
    }

    #[test]
    fn test_empty_layer_is_not_a_source() {
        let mut loaded = LoadedConfig::default();
        assert_eq!(loaded.layer(&Config::default(), ConfigSource::UserGlobal), 0);
        assert_eq!(loaded.sources, vec![ConfigSource::Default]);
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut loaded = LoadedConfig::default();
        loaded.layer(&manifest("matching:\n  precision: low\n"), ConfigSource::UserGlobal);
        apply_env(
            &mut loaded,
            env_from(&[
                ("FUZZRANK_PRECISION", "none"),
                ("FUZZRANK_FORMAT", "JSON"),
                ("FUZZRANK_LIMIT", "3"),
                ("NO_COLOR", "1"),
            ]),
        );
        assert_eq!(loaded.config.precision(), PrecisionLevel::None);
        assert_eq!(loaded.config.format(), OutputFormat::Json);
        assert_eq!(loaded.config.display.limit, Some(3));
        assert_eq!(
            loaded.origin(ConfigKey::Precision),
            ConfigSource::EnvVar("FUZZRANK_PRECISION".to_string())
        );
        assert_eq!(loaded.sources.len(), 5);
    }

    #[test]
    fn test_apply_env_ignores_invalid() {
        let mut loaded = LoadedConfig::default();
        apply_env(
            &mut loaded,
            env_from(&[("FUZZRANK_PRECISION", "max"), ("FUZZRANK_LIMIT", "many")]),
        );
        assert_eq!(loaded, LoadedConfig::default());
    }

    #[test]
    fn test_env_overlay_reports_errors() {
        let precision = &ENV_VARS[0];
        assert!(matches!(env_overlay(precision, "low"), Some(Ok(_))));
        let err = env_overlay(precision, "max").unwrap().unwrap_err();
        assert!(err.contains("invalid precision"));

        let no_color = ENV_VARS.iter().find(|v| v.name == "NO_COLOR").unwrap();
        assert!(env_overlay(no_color, "1").is_none());
    }

    #[test]
    fn test_effective_values() {
        let mut config = Config::default();
        assert_eq!(
            ConfigKey::Precision.effective_value(&config),
            "regular (threshold 50)"
        );
        assert_eq!(ConfigKey::Limit.effective_value(&config), "unlimited");
        assert_eq!(ConfigKey::Highlight.effective_value(&config), "yellow");

        config.display.highlight = Some("magenta".to_string());
        assert_eq!(ConfigKey::Highlight.effective_value(&config), "magenta");
        config.display.highlight = Some("sparkly".to_string());
        assert!(ConfigKey::Highlight.effective_value(&config).contains("unknown color"));
    }

    #[test]
    fn test_nearest_manifest_wins() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(MANIFEST_FILE),
            "matching:\n  precision: none\ndisplay:\n  limit: 7\n",
        )
        .unwrap();
        fs::write(
            root.path().join("a").join(MANIFEST_FILE),
            "matching:\n  precision: low\n",
        )
        .unwrap();

        let mut loaded = LoadedConfig::default();
        for path in collect_manifest_paths(&nested) {
            if let Some(c) = load_manifest(&path) {
                loaded.layer(&c, ConfigSource::ProjectManifest(path.display().to_string()));
            }
        }
        assert_eq!(loaded.config.precision(), PrecisionLevel::Low);
        assert_eq!(loaded.config.display.limit, Some(7));
        assert!(loaded.origin(ConfigKey::Precision).to_string().contains("a/.fuzzrank.yaml"));
    }

    #[test]
    fn test_malformed_manifest_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "matching: [not, a, map\n").unwrap();
        assert!(load_manifest(&path).is_none());
    }

    #[test]
    fn test_json_schema_generates() {
        let schema = json_schema();
        assert!(schema.contains("MatchingConfig"));
        assert!(schema.contains("PrecisionLevel"));
    }

    #[test]
    fn test_template_manifest_parses() {
        let config: Config = serde_yaml::from_str(&template_manifest(None)).unwrap_or_default();
        assert_eq!(config, Config::default());

        let config = manifest(&template_manifest(Some(PrecisionLevel::Low)));
        assert_eq!(config.precision(), PrecisionLevel::Low);
        assert_eq!(config.display, DisplayConfig::default());
    }
}
