mod commands;
mod logging;
mod progress;

use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, InputArgs};
use dotenv::dotenv;
use ingest_audit_core::report;
use ingest_audit_core::{AppConfig, AuditEngine, FileRecordStore, ProfileStore};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match ingest_audit_core::config::load_configuration(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    match args.command {
        Some(Commands::Run(inputs)) => {
            if let Err(err) = run_audit(config, &inputs) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::Sources(inputs)) => {
            if let Err(err) = run_sources(config, &inputs) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            println!("CV data path: {}", config.cv_data_path().display());
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_audit(mut config: AppConfig, inputs: &InputArgs) -> anyhow::Result<()> {
    inputs.apply(&mut config);
    let cv_data_path = config.cv_data_path();

    let engine = AuditEngine::new(config);
    let reporter = CliReporter::new();
    let result = match engine.run(&reporter) {
        Err(err @ ingest_audit_core::Error::MissingData { what: "CV data", .. }) => {
            return Err(err).with_context(|| {
                format!(
                    "mine the source profiles into '{}' before auditing",
                    cv_data_path.display()
                )
            });
        }
        other => other.context("audit failed")?,
    };

    println!();
    info!(
        "Load: {}, Detect: {}, Write: {}",
        format!("{:.2}s", result.load_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.detect_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.write_duration.as_secs_f64()).green(),
    );
    if result.skipped_rows > 0 {
        warn!(
            "{} rows of the file listing were skipped",
            format!("{}", result.skipped_rows).yellow()
        );
    }

    let Some(path) = &result.report_path else {
        info!(
            "{} files from {} sources audited for {}: no incidents found",
            result.files_audited,
            result.sources_audited,
            result.operation_date.to_string().cyan(),
        );
        return Ok(());
    };

    let summary = report::summarize(&result.incidents);
    info!(
        "{} incidents ({} duplicated or failed, {} unexpected empty) across {} sources",
        format!("{}", summary.incidents).red(),
        format!("{}", summary.duplicated_or_failed).red(),
        format!("{}", summary.unexpected_empty).red(),
        format!("{}", summary.sources_affected).cyan(),
    );
    info!(
        "{} files to review, report saved to {}",
        format!("{}", summary.files_to_review).red(),
        path.display(),
    );

    Ok(())
}

fn run_sources(mut config: AppConfig, inputs: &InputArgs) -> anyhow::Result<()> {
    inputs.apply(&mut config);
    let operation_date = config.operation_date()?;

    let records = FileRecordStore::from_csv_path(&config.files_path(), operation_date)
        .context("could not load the file listing")?;
    let profiles = match ProfileStore::from_json_path(&config.cv_data_path()) {
        Ok(profiles) => profiles,
        Err(err) => {
            warn!("{}; listing sources without profiles", err);
            ProfileStore::default()
        }
    };

    let groups = records.by_source();
    println!("Sources on {}:", operation_date.to_string().cyan());
    for source_id in ingest_audit_core::engine::sources_to_audit(&records, &profiles) {
        let files = groups.get(source_id).map(Vec::len).unwrap_or(0);
        let profiled = if profiles.contains(source_id) {
            "profiled".green()
        } else {
            "no profile".yellow()
        };
        println!("  {:<24} {:>6} files  {}", source_id, files, profiled);
    }

    Ok(())
}
