use crate::error::Error;
use crate::storage::models::{IncidentRecord, IncidentType};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn report_file_name(operation_date: NaiveDate) -> String {
    format!("{}_incidents_report.json", operation_date.format("%Y-%m-%d"))
}

/// Write the incidents as a pretty-printed JSON array into `output_dir`,
/// creating the directory when needed.
pub fn write_report(
    output_dir: &Path,
    operation_date: NaiveDate,
    incidents: &[IncidentRecord],
) -> Result<PathBuf, Error> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(operation_date));

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, incidents)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Wrote {} incidents to {}", incidents.len(), path.display());
    Ok(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub incidents: usize,
    pub duplicated_or_failed: usize,
    pub unexpected_empty: usize,
    pub files_to_review: usize,
    pub sources_affected: usize,
}

pub fn summarize(incidents: &[IncidentRecord]) -> ReportSummary {
    let mut summary = ReportSummary {
        incidents: incidents.len(),
        ..Default::default()
    };
    let mut sources = HashSet::new();

    for incident in incidents {
        match incident.incident_type {
            IncidentType::DuplicatedOrFailed => summary.duplicated_or_failed += 1,
            IncidentType::UnexpectedEmpty => summary.unexpected_empty += 1,
        }
        summary.files_to_review += incident.files_to_review.len();
        sources.insert(incident.source_id.as_str());
    }

    summary.sources_affected = sources.len();
    summary
}
