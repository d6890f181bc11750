use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream input (file listing or CV data) could not be found.
    #[error("{what} not found at '{}'", path.display())]
    MissingData { what: &'static str, path: PathBuf },

    #[error("No operation date configured; set operation_date or pass --date")]
    MissingOperationDate,

    #[error("Invalid operation date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
