use crate::detection::EmptyFilePolicy;
use crate::error::Error;
use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Day being audited, `YYYY-MM-DD`.
    #[serde(default)]
    pub operation_date: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// CSV listing of ingested files.
    #[serde(default = "default_files_path")]
    pub files_path: String,
    /// Mined source profiles. Defaults to `cv_data.json` inside `output_dir`.
    #[serde(default)]
    pub cv_data_path: Option<String>,
    #[serde(default)]
    pub policy: EmptyFilePolicy,
}

fn default_output_dir() -> String {
    "outputs".to_string()
}

fn default_files_path() -> String {
    "data/files.csv".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operation_date: None,
            output_dir: default_output_dir(),
            files_path: default_files_path(),
            cv_data_path: None,
            policy: EmptyFilePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn operation_date(&self) -> Result<NaiveDate, Error> {
        let raw = self
            .operation_date
            .as_deref()
            .ok_or(Error::MissingOperationDate)?;
        parse_operation_date(raw)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn files_path(&self) -> PathBuf {
        PathBuf::from(&self.files_path)
    }

    pub fn cv_data_path(&self) -> PathBuf {
        match &self.cv_data_path {
            Some(path) => PathBuf::from(path),
            None => self.output_dir().join("cv_data.json"),
        }
    }
}

pub fn parse_operation_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Load the given file, or `Config.toml` from the working directory when present,
/// then `AUDIT_*` environment variables (`AUDIT_POLICY__TOLERANCE` for nested keys).
/// An explicitly named file must exist.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file_source = match path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Config").required(false),
    };

    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("AUDIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
