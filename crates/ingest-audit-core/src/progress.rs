use std::path::Path;

/// Trait for reporting audit progress.
///
/// CLI implements with indicatif. All methods have default no-op implementations.
/// Source callbacks may arrive from several rayon workers at once.
pub trait ProgressReporter: Send + Sync {
    fn on_load_start(&self) {}
    fn on_load_complete(&self, _files: usize, _profiles: usize, _duration_secs: f64) {}
    fn on_detect_start(&self, _total_sources: usize) {}
    fn on_source_audited(&self, _source_id: &str, _incidents: usize) {}
    fn on_detect_complete(&self, _total_incidents: usize, _duration_secs: f64) {}
    fn on_report_written(&self, _path: &Path, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
