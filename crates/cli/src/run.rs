//! `stockcheck run|validate|config`

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use stockcheck_recon::{AuditConfig, ReconError};

use crate::exit_codes::{
    EXIT_DEVIATION, EXIT_DUPLICATE_CODE, EXIT_INGEST, EXIT_INVALID_CONFIG,
};
use crate::{export, report, CliError};

pub struct RunArgs {
    pub ledger: PathBuf,
    pub count: PathBuf,
    pub config: Option<PathBuf>,
    pub date: Option<NaiveDate>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub fail_on_deviation: bool,
    pub quiet: bool,
}

fn config_err(e: ReconError) -> CliError {
    let code = match e {
        ReconError::DuplicateCode { .. } => EXIT_DUPLICATE_CODE,
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::MissingColumn { .. } => EXIT_INVALID_CONFIG,
    };
    CliError::new(code, e.to_string())
}

fn load_config(path: Option<&Path>) -> Result<AuditConfig, CliError> {
    let Some(path) = path else {
        return Ok(AuditConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = AuditConfig::from_toml(&text).map_err(config_err)?;
    log::info!("loaded config '{}' from {}", config.name, path.display());
    Ok(config)
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let run_date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let (ledger, count) = stockcheck_io::load_pair(&args.ledger, &args.count).map_err(|e| {
        CliError::new(EXIT_INGEST, "files could not be processed; check format and retry")
            .with_hint(e.to_string())
    })?;

    let mut result = stockcheck_recon::run(&config, &ledger, &count, run_date).map_err(config_err)?;
    stockcheck_recon::sort_by_deviation(&mut result.records);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = args.csv {
        let file = std::fs::File::create(path)
            .map_err(|e| CliError::io(format!("cannot create {}: {e}", path.display())))?;
        export::write_records_csv(&result.records, std::io::BufWriter::new(file))
            .map_err(CliError::io)?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        println!("{json_str}");
    } else {
        print!(
            "{}",
            report::render_text(&result, config.report.significant_delta_kg)
        );
    }

    let s = &result.summary;
    if !args.quiet {
        eprintln!(
            "audit: {} products, {} matched, {} not counted, {} not in ledger, {} significant, delta {} kg",
            s.total_products,
            s.matched,
            s.uncounted,
            s.unlisted,
            s.significant_count,
            report::signed(s.total_delta_kg),
        );
    }

    if args.fail_on_deviation && s.significant_count > 0 {
        return Err(CliError::new(
            EXIT_DEVIATION,
            format!(
                "{} product(s) deviate more than {} kg",
                s.significant_count, config.report.significant_delta_kg
            ),
        ));
    }

    Ok(())
}

pub fn cmd_validate(path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&path))?;
    eprintln!("config '{}' is valid", config.name);
    Ok(())
}

pub fn cmd_config() -> Result<(), CliError> {
    let text = AuditConfig::default()
        .to_toml()
        .map_err(|e| CliError::io(e.to_string()))?;
    print!("{text}");
    Ok(())
}
