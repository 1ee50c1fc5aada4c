use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::env::CompleteEnv;
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod config;
mod input;
mod output;

#[derive(Parser)]
#[command(name = "fuzzrank")]
#[command(version = env!("FUZZRANK_VERSION"))]
#[command(about = "Fuzzy-match and rank candidate labels against a query")]
#[command(
    long_about = "fuzzrank - Launcher-style fuzzy matching and relevance scoring.\n\nA query is split into whitespace-separated terms; a candidate matches when\nevery term appears in it as a subsequence, or when a single-term query spells\nthe candidate's acronym. Matches are scored by how tightly and how early they\noccur, and filtered by a precision level (none, low, regular)."
)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidates from a file or stdin
    #[command(alias = "r")]
    Rank(cmd::rank::RankArgs),

    /// Show score details for each candidate
    Score(cmd::score::ScoreArgs),

    /// Generate shell completion script
    Completion(CompletionArgs),

    /// Configuration introspection
    Config(cmd::config_cmd::ConfigArgs),
}

#[derive(clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Clone, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "fuzzrank=debug"
    } else {
        "fuzzrank=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    // Handle dynamic shell completions
    CompleteEnv::with_factory(Cli::command).complete();

    // Use try_parse to catch errors and normalize exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Exit with 0 for help/version, 1 for actual errors
            let exit_code = if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                0
            } else {
                1
            };
            process::exit(exit_code);
        }
    };

    init_logging(cli.verbose);

    // Completion doesn't need config
    if let Commands::Completion(args) = &cli.command {
        let shell = match args.shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
        };
        generate(shell, &mut Cli::command(), "fuzzrank", &mut io::stdout());
        return;
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("cannot get cwd: {}", e);
            process::exit(1);
        }
    };
    let loaded_config = config::load_config(&cwd);

    if config::env_string("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Rank(args) => cmd::rank::run(args, &loaded_config.config),
        Commands::Score(args) => cmd::score::run(args, &loaded_config.config),
        Commands::Config(args) => cmd::config_cmd::run(args),
        Commands::Completion(_) => unreachable!(), // Handled above
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
