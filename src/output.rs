//! Output formatting utilities with TTY auto-detection and semantic styling.

use std::io::IsTerminal;

use clap::ValueEnum;
use colored::{Color, ColoredString, Colorize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// Output format for commands.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-optimized: colors, tables, highlighted matches
    #[default]
    Pretty,
    /// Script-optimized: no colors, pipe-delimited
    Plain,
    /// Machine-readable JSON
    Json,
    /// Machine-readable YAML
    Yaml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Resolve the output format, applying TTY auto-detection.
    ///
    /// If format is Pretty but stdout is not a TTY, returns Plain.
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Pretty if !std::io::stdout().is_terminal() => OutputFormat::Plain,
            other => other,
        }
    }
}

// ============================================================================
// Semantic Styling
// ============================================================================

/// Scores that clear the precision bar are bold, the rest dimmed.
pub fn style_score(score: u32, passes: bool) -> ColoredString {
    let s = score.to_string();
    if passes { s.bold() } else { s.dimmed() }
}

/// Parse a color name from config, falling back to yellow.
pub fn highlight_color(name: Option<&str>) -> Color {
    name.and_then(|n| n.parse::<Color>().ok())
        .unwrap_or(Color::Yellow)
}

/// Render `text` with the chars at `indices` highlighted.
///
/// `indices` are char positions and must be sorted. When `max_width` is set
/// the text is cut to that many terminal columns with a trailing ellipsis.
pub fn highlight(text: &str, indices: &[usize], color: Color, max_width: Option<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = indices.iter().copied().peekable();
    let total_width: usize = text.chars().filter_map(|c| c.width()).sum();
    let budget = match max_width {
        Some(w) if total_width > w => Some(w.saturating_sub(1)),
        _ => None,
    };

    let mut used = 0usize;
    for (idx, c) in text.chars().enumerate() {
        let w = c.width().unwrap_or(0);
        if let Some(limit) = budget
            && used + w > limit
        {
            out.push('…');
            break;
        }
        used += w;

        while pending.next_if(|&i| i < idx).is_some() {}
        if pending.next_if_eq(&idx).is_some() {
            out.push_str(&c.to_string().color(color).bold().to_string());
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Terminal utilities
// ============================================================================

/// Get terminal width, defaulting to 80 if unavailable.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}
