use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use fuzzrank::{MatchKind, MatchResult, PrecisionLevel, StringMatcher};

use crate::args::{FormatArgs, PrecisionArgs};
use crate::config::Config;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ScoreArgs {
    /// Query to score
    query: String,

    /// Candidates to score the query against
    #[arg(required = true, num_args = 1..)]
    candidates: Vec<String>,

    #[command(flatten)]
    precision: PrecisionArgs,

    #[command(flatten)]
    format: FormatArgs,
}

pub fn run(args: ScoreArgs, config: &Config) -> Result<(), String> {
    let format = args.format.resolve(config);
    let matcher = StringMatcher::new(args.precision.resolve(config));

    let scored: Vec<(&str, MatchResult)> = args
        .candidates
        .iter()
        .map(|c| (c.as_str(), matcher.fuzzy_match(&args.query, c)))
        .collect();

    match format {
        OutputFormat::Pretty => output_pretty(&scored, matcher.precision, config),
        OutputFormat::Plain => output_plain(&scored),
        OutputFormat::Json => output_json(&args.query, &scored),
        OutputFormat::Yaml => output_yaml(&args.query, &scored),
    }
}

/// Row data for pretty output table.
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "RAW")]
    raw: String,
    #[tabled(rename = "SCORE")]
    normalized: String,
    #[tabled(rename = "PASS")]
    passes: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "CANDIDATE")]
    candidate: String,
}

fn kind_label(result: &MatchResult) -> &'static str {
    result.kind.map_or("-", MatchKind::as_str)
}

fn output_pretty(
    scored: &[(&str, MatchResult)],
    precision: PrecisionLevel,
    config: &Config,
) -> Result<(), String> {
    println!(
        "Scores at precision {} (threshold {})",
        precision.to_string().bold(),
        precision.threshold()
    );
    println!();

    let color = output::highlight_color(config.display.highlight.as_deref());
    let candidate_max = output::terminal_width().saturating_sub(40).max(16);

    let rows: Vec<TableRow> = scored
        .iter()
        .map(|(candidate, r)| TableRow {
            raw: r.raw_score.to_string(),
            normalized: output::style_score(r.normalized_score, r.passes).to_string(),
            passes: if r.passes {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            },
            kind: kind_label(r).dimmed().to_string(),
            candidate: output::highlight(candidate, &r.matched_indices, color, Some(candidate_max)),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    Ok(())
}

fn output_plain(scored: &[(&str, MatchResult)]) -> Result<(), String> {
    println!("RAW | SCORE | PASSES | KIND | INDICES | CANDIDATE");
    for (candidate, r) in scored {
        let indices: Vec<String> = r.matched_indices.iter().map(|i| i.to_string()).collect();
        println!(
            "{} | {} | {} | {} | {} | {}",
            r.raw_score,
            r.normalized_score,
            r.passes,
            kind_label(r),
            indices.join(","),
            candidate
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ScoreJson<'a> {
    candidate: &'a str,
    #[serde(flatten)]
    result: &'a MatchResult,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    query: &'a str,
    results: Vec<ScoreJson<'a>>,
}

fn build_output<'a>(query: &'a str, scored: &'a [(&'a str, MatchResult)]) -> ScoreOutput<'a> {
    ScoreOutput {
        query,
        results: scored
            .iter()
            .map(|(candidate, result)| ScoreJson {
                candidate: *candidate,
                result,
            })
            .collect(),
    }
}

fn output_json(query: &str, scored: &[(&str, MatchResult)]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&build_output(query, scored))
        .map_err(|e| format!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn output_yaml(query: &str, scored: &[(&str, MatchResult)]) -> Result<(), String> {
    let yaml = serde_yaml::to_string(&build_output(query, scored))
        .map_err(|e| format!("YAML serialization failed: {}", e))?;
    print!("{}", yaml);
    Ok(())
}
