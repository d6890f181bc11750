use crate::config::AppConfig;
use crate::detection::{
    detect_duplicated_and_failed_files, detect_unexpected_empty_files, EmptyFilePolicy,
};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::report;
use crate::storage::models::{FileRecord, IncidentRecord};
use crate::storage::{FileRecordStore, ProfileStore};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct AuditEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct AuditResult {
    pub operation_date: NaiveDate,
    pub sources_audited: usize,
    pub files_audited: usize,
    pub skipped_rows: usize,
    pub incidents: Vec<IncidentRecord>,
    /// `None` when nothing was found and no report was written.
    pub report_path: Option<PathBuf>,
    pub load_duration: Duration,
    pub detect_duration: Duration,
    pub write_duration: Duration,
}

impl AuditEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(mut self, policy: EmptyFilePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full audit for the configured operation date:
    /// 1. Load the day's file listing and the source profiles
    /// 2. Run both detectors for every source
    /// 3. Write the JSON report when anything was found
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<AuditResult, Error> {
        let operation_date = self.config.operation_date()?;
        info!("Auditing ingestion for {}", operation_date);

        // Phase 1: Load
        reporter.on_load_start();
        let load_start = Instant::now();
        let records = FileRecordStore::from_csv_path(&self.config.files_path(), operation_date)?;
        let profiles = ProfileStore::from_json_path(&self.config.cv_data_path())?;
        let load_duration = load_start.elapsed();
        if records.skipped_rows() > 0 {
            warn!("{} rows of the file listing could not be read", records.skipped_rows());
        }
        info!(
            "{} files processed on {}, {} source profiles",
            records.len(),
            operation_date,
            profiles.len()
        );
        reporter.on_load_complete(records.len(), profiles.len(), load_duration.as_secs_f64());

        // Phase 2: Detect
        let sources = sources_to_audit(&records, &profiles);
        reporter.on_detect_start(sources.len());
        let detect_start = Instant::now();
        let incidents = self.audit(&records, &profiles, reporter);
        let detect_duration = detect_start.elapsed();
        debug!(
            "Detection completed in {:.2}s, {} incidents across {} sources",
            detect_duration.as_secs_f64(),
            incidents.len(),
            sources.len()
        );
        reporter.on_detect_complete(incidents.len(), detect_duration.as_secs_f64());

        // Phase 3: Report
        let write_start = Instant::now();
        let report_path = if incidents.is_empty() {
            info!("No incidents found for {}", operation_date);
            None
        } else {
            let path = report::write_report(&self.config.output_dir(), operation_date, &incidents)?;
            reporter.on_report_written(&path, write_start.elapsed().as_secs_f64());
            Some(path)
        };
        let write_duration = write_start.elapsed();

        Ok(AuditResult {
            operation_date,
            sources_audited: sources.len(),
            files_audited: records.len(),
            skipped_rows: records.skipped_rows(),
            incidents,
            report_path,
            load_duration,
            detect_duration,
            write_duration,
        })
    }

    /// Run both detectors for every source, in parallel across sources.
    /// Output order follows [`sources_to_audit`]; per source the
    /// duplicate/failure incident precedes the empty-file incident.
    pub fn audit(
        &self,
        records: &FileRecordStore,
        profiles: &ProfileStore,
        reporter: &dyn ProgressReporter,
    ) -> Vec<IncidentRecord> {
        let operation_date = records.operation_date();
        let policy = &self.config.policy;
        let groups = records.by_source();
        let sources = sources_to_audit(records, profiles);

        sources
            .par_iter()
            .map(|source_id| {
                let files: &[&FileRecord] = groups.get(source_id).map(Vec::as_slice).unwrap_or(&[]);
                let profile = profiles.get(source_id);
                debug!("Analyzing source '{}' ({} files)", source_id, files.len());

                let mut found = Vec::with_capacity(2);
                if let Some(incident) = detect_duplicated_and_failed_files(files) {
                    info!("Source '{}': {} incident found", source_id, incident.incident_type);
                    found.push(incident);
                }
                if let Some(incident) =
                    detect_unexpected_empty_files(files, profile, operation_date, policy)
                {
                    info!("Source '{}': {} incident found", source_id, incident.incident_type);
                    found.push(incident);
                }

                reporter.on_source_audited(source_id, found.len());
                found
            })
            .collect::<Vec<Vec<IncidentRecord>>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Profiled sources in document order, then sources that only appear in the
/// day's listing, in first-appearance order.
pub fn sources_to_audit<'a>(records: &'a FileRecordStore, profiles: &'a ProfileStore) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for id in profiles.source_ids().into_iter().chain(records.source_ids()) {
        if seen.insert(id) {
            sources.push(id);
        }
    }

    sources
}
