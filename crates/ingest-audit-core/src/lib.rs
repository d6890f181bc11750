pub mod config;
pub mod detection;
pub mod engine;
pub mod error;
pub mod progress;
pub mod report;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::detection::EmptyFilePolicy;
pub use crate::engine::{AuditEngine, AuditResult};
pub use crate::error::Error;
pub use crate::progress::{ProgressReporter, SilentReporter};
pub use crate::storage::models::{
    FileRecord, FileStatus, IncidentRecord, IncidentType, SourceVolumeProfile,
};
pub use crate::storage::{FileRecordStore, ProfileStore};
