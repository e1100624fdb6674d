// stockcheck - inventory audit from the command line

mod exit_codes;
mod export;
mod logging;
mod report;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use exit_codes::*;

#[derive(Parser)]
#[command(name = "stockcheck")]
#[command(about = "Reconcile a stock ledger against a physical count")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a ledger export against a count sheet
    #[command(after_help = "\
Examples:
  stockcheck run estoque.xlsx contagem.xlsx
  stockcheck run estoque.ods contagem.ods --date 2026-10-19
  stockcheck run estoque.xlsx contagem.xlsx --config audit.toml --json
  stockcheck run estoque.csv contagem.csv --output result.json --csv result.csv
  stockcheck run estoque.xlsx contagem.xlsx --fail-on-deviation --quiet")]
    Run {
        /// Stock ledger export (.xlsx, .xls, .ods, .csv, .tsv)
        ledger: PathBuf,

        /// Physical count sheet (.xlsx, .xls, .ods, .csv, .tsv)
        count: PathBuf,

        /// Audit config (TOML). Built-in defaults when omitted
        #[arg(long, short = 'c', env = "STOCKCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Audit date, YYYY-MM-DD. Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output JSON to stdout instead of the text report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write variance records to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Exit with code 5 when any product deviates beyond the threshold
        #[arg(long)]
        fail_on_deviation: bool,

        /// Suppress the summary line on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate an audit config without running
    #[command(after_help = "\
Examples:
  stockcheck validate audit.toml")]
    Validate {
        /// Path to the audit config
        config: PathBuf,
    },

    /// Print the built-in default config as TOML
    #[command(after_help = "\
Examples:
  stockcheck config > audit.toml")]
    Config,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            ledger,
            count,
            config,
            date,
            json,
            output,
            csv,
            fail_on_deviation,
            quiet,
        } => run::cmd_run(run::RunArgs {
            ledger,
            count,
            config,
            date,
            json,
            output,
            csv,
            fail_on_deviation,
            quiet,
        }),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Config => run::cmd_config(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
