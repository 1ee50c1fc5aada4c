use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use fuzzrank::{MatchResult, PrecisionLevel, Ranked, classify};

use crate::args::{FormatArgs, PrecisionArgs};
use crate::config::Config;
use crate::input;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RankArgs {
    /// Query to match against every candidate
    query: String,

    /// File with one candidate per line (default: stdin, or "-")
    file: Option<PathBuf>,

    #[command(flatten)]
    precision: PrecisionArgs,

    /// Show at most N results
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Also list matches that miss the precision level
    #[arg(short = 'a', long)]
    all: bool,

    #[command(flatten)]
    format: FormatArgs,
}

/// A ranked candidate ready for display.
struct RankedCandidate<'a> {
    /// 1-based input line among non-blank candidates
    line: usize,
    candidate: &'a str,
    result: MatchResult,
}

pub fn run(args: RankArgs, config: &Config) -> Result<(), String> {
    let format = args.format.resolve(config);
    let precision = args.precision.resolve(config);
    let limit = args.limit.or(config.display.limit);

    let query = args.query.trim();
    if query.is_empty() {
        return Err("query is required".to_string());
    }

    let candidates = input::read_candidates(args.file.as_deref())?;
    let mut ranked = collect(query, &candidates, precision, args.all);
    let total = ranked.len();
    if let Some(n) = limit {
        ranked.truncate(n);
    }

    let results: Vec<RankedCandidate<'_>> = ranked
        .into_iter()
        .map(|r| RankedCandidate {
            line: r.index + 1,
            candidate: &candidates[r.index],
            result: r.result,
        })
        .collect();

    let header = Header {
        query,
        precision,
        candidates: candidates.len(),
        matches: total,
        all: args.all,
    };

    match format {
        OutputFormat::Pretty => output_pretty(&results, &header, config),
        OutputFormat::Plain => output_plain(&results, &header),
        OutputFormat::Json => output_json(&results, &header),
        OutputFormat::Yaml => output_yaml(&results, &header),
    }
}

/// Rank `candidates`, keeping failing matches too when `all` is set.
///
/// With `all`, every nonzero match is ranked and then classified against
/// `precision` so the pass flag stays meaningful.
fn collect(query: &str, candidates: &[String], precision: PrecisionLevel, all: bool) -> Vec<Ranked> {
    if !all {
        return fuzzrank::rank(query, candidates, precision);
    }

    let mut ranked = fuzzrank::rank(query, candidates, PrecisionLevel::None);
    for r in &mut ranked {
        let classification = classify(r.result.raw_score, precision);
        r.result.precision = precision;
        r.result.normalized_score = classification.normalized;
        r.result.passes = classification.passes;
    }
    ranked
}

struct Header<'a> {
    query: &'a str,
    precision: PrecisionLevel,
    candidates: usize,
    matches: usize,
    all: bool,
}

impl Header<'_> {
    fn describe(&self) -> String {
        let mut parts = vec![
            format!("query=\"{}\"", self.query),
            format!("precision={}", self.precision),
        ];
        if self.all {
            parts.push("all".to_string());
        }
        parts.join(", ")
    }
}

/// Row data for pretty output table.
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "SCORE")]
    score: String,
    #[tabled(rename = "LINE")]
    line: String,
    #[tabled(rename = "CANDIDATE")]
    candidate: String,
}

fn output_pretty(
    results: &[RankedCandidate<'_>],
    header: &Header<'_>,
    config: &Config,
) -> Result<(), String> {
    println!(
        "{} of {} candidates match ({})",
        header.matches.to_string().bold(),
        header.candidates,
        header.describe().dimmed()
    );
    if results.len() < header.matches {
        println!(
            "{}",
            format!("Showing top {}.", results.len()).dimmed()
        );
    }
    println!();

    if results.is_empty() {
        println!("{}", "No matches.".dimmed());
        if header.precision != PrecisionLevel::None {
            println!(
                "{}",
                "Hint: use --precision low or --all to see weaker matches".dimmed()
            );
        }
        return Ok(());
    }

    let color = output::highlight_color(config.display.highlight.as_deref());
    // Borders plus the SCORE and LINE columns
    let candidate_max = output::terminal_width().saturating_sub(24).max(16);

    let rows: Vec<TableRow> = results
        .iter()
        .map(|r| TableRow {
            score: output::style_score(r.result.raw_score, r.result.passes).to_string(),
            line: r.line.to_string().dimmed().to_string(),
            candidate: output::highlight(
                r.candidate,
                &r.result.matched_indices,
                color,
                Some(candidate_max),
            ),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    Ok(())
}

fn output_plain(results: &[RankedCandidate<'_>], header: &Header<'_>) -> Result<(), String> {
    println!(
        "Showing {} of {} matches in {} candidates ({})",
        results.len(),
        header.matches,
        header.candidates,
        header.describe()
    );
    println!();

    if results.is_empty() {
        return Ok(());
    }

    println!("SCORE | LINE | PASSES | CANDIDATE");
    for r in results {
        println!(
            "{} | {} | {} | {}",
            r.result.raw_score, r.line, r.result.passes, r.candidate
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct RankedJson<'a> {
    line: usize,
    candidate: &'a str,
    #[serde(flatten)]
    result: &'a MatchResult,
}

#[derive(Serialize)]
struct RankOutput<'a> {
    query: &'a str,
    precision: PrecisionLevel,
    candidates: usize,
    total_matches: usize,
    matches: Vec<RankedJson<'a>>,
}

fn build_output<'a>(results: &'a [RankedCandidate<'a>], header: &'a Header<'a>) -> RankOutput<'a> {
    RankOutput {
        query: header.query,
        precision: header.precision,
        candidates: header.candidates,
        total_matches: header.matches,
        matches: results
            .iter()
            .map(|r| RankedJson {
                line: r.line,
                candidate: r.candidate,
                result: &r.result,
            })
            .collect(),
    }
}

fn output_json(results: &[RankedCandidate<'_>], header: &Header<'_>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&build_output(results, header))
        .map_err(|e| format!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn output_yaml(results: &[RankedCandidate<'_>], header: &Header<'_>) -> Result<(), String> {
    let yaml = serde_yaml::to_string(&build_output(results, header))
        .map_err(|e| format!("YAML serialization failed: {}", e))?;
    print!("{}", yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps() -> Vec<String> {
        [
            "Google Chrome",
            "Help cure hope raise on mind entity Chrome",
            "Candy Crush Saga from King",
            "Last is chrome",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_collect_filters_by_precision() {
        let ranked = collect("chrome", &apps(), PrecisionLevel::Regular, false);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 3]);
        assert!(ranked.iter().all(|r| r.result.passes));
    }

    #[test]
    fn test_collect_all_keeps_failing_matches() {
        let ranked = collect("chrome", &apps(), PrecisionLevel::Regular, true);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 3, 1]);

        let weak = &ranked[2].result;
        assert_eq!(weak.raw_score, 25);
        assert_eq!(weak.normalized_score, 0);
        assert_eq!(weak.precision, PrecisionLevel::Regular);
        assert!(!weak.passes);
    }

    #[test]
    fn test_header_describe() {
        let header = Header {
            query: "chr",
            precision: PrecisionLevel::Low,
            candidates: 4,
            matches: 2,
            all: true,
        };
        assert_eq!(header.describe(), "query=\"chr\", precision=low, all");
    }
}
