//! Shared CLI argument structs for consistent flag definitions across commands.
//!
//! Use `#[command(flatten)]` to include them in command-specific Args structs.
//! Every flag is optional so that unset flags fall back to the loaded config.

use clap::Args;

use fuzzrank::PrecisionLevel;

use crate::config::Config;
use crate::output::OutputFormat;

// ============================================================================
// FormatArgs - Output format flags
// ============================================================================

/// Common output format flags.
///
/// Provides consistent --format/-f and --json flags across commands.
#[derive(Args, Clone, Debug, Default)]
pub struct FormatArgs {
    /// Output format (auto-detects TTY for pretty vs plain)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (shorthand for --format=json)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl FormatArgs {
    /// Resolve the effective output format.
    ///
    /// Flags win over config; pretty degrades to plain off a TTY.
    pub fn resolve(&self, config: &Config) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format.unwrap_or_else(|| config.format()).resolve()
        }
    }
}

// ============================================================================
// PrecisionArgs - Match precision flags
// ============================================================================

/// Common precision flag.
#[derive(Args, Clone, Debug, Default)]
pub struct PrecisionArgs {
    /// Minimum match precision: none, low, regular
    #[arg(short = 'p', long, value_name = "LEVEL")]
    pub precision: Option<PrecisionLevel>,
}

impl PrecisionArgs {
    pub fn resolve(&self, config: &Config) -> PrecisionLevel {
        self.precision.unwrap_or_else(|| config.precision())
    }
}
