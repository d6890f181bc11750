use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ingest-audit")]
#[command(about = "Audit a day of ingested files for duplicated, failed and unexpectedly empty files", long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of ./Config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run both detectors for every source and write the incident report
    Run(InputArgs),
    /// List the sources seen on the operation date
    Sources(InputArgs),
    /// Print configuration values
    PrintConfig,
}

/// Overrides for the configured inputs.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Operation date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    /// CSV listing of ingested files
    #[arg(long)]
    pub files: Option<String>,
    /// Source profiles (CV data) JSON
    #[arg(long)]
    pub cv_data: Option<String>,
    /// Directory the report is written to
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl InputArgs {
    pub fn apply(&self, config: &mut ingest_audit_core::AppConfig) {
        if let Some(date) = &self.date {
            config.operation_date = Some(date.clone());
        }
        if let Some(files) = &self.files {
            config.files_path = files.clone();
        }
        if let Some(cv_data) = &self.cv_data {
            config.cv_data_path = Some(cv_data.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
    }
}
