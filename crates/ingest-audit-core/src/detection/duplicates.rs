use crate::storage::models::{FileRecord, IncidentRecord, IncidentType};
use tracing::debug;

/// Flag files marked as duplicated or whose status is `stopped`.
///
/// All matches are aggregated into a single incident, listing filenames in input order.
pub fn detect_duplicated_and_failed_files(records: &[&FileRecord]) -> Option<IncidentRecord> {
    let flagged: Vec<&FileRecord> = records
        .iter()
        .copied()
        .filter(|record| record.is_duplicated || record.status.is_stopped())
        .collect();

    let Some(first) = flagged.first() else {
        debug!("No duplicated or failed files among {} records", records.len());
        return None;
    };

    let duplicated = flagged.iter().filter(|r| r.is_duplicated).count();
    let stopped = flagged.iter().filter(|r| r.status.is_stopped()).count();

    Some(IncidentRecord {
        source_id: first.source_id.clone(),
        incident_type: IncidentType::DuplicatedOrFailed,
        incident_details: format!(
            "{} file(s) marked as duplicated or failed: {} flagged as duplicated, {} with status 'stopped'.",
            flagged.len(),
            duplicated,
            stopped
        ),
        total_incidents: flagged.len(),
        files_to_review: flagged.iter().map(|r| r.filename.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::FileStatus;

    fn record(name: &str, duplicated: bool, status: &str) -> FileRecord {
        FileRecord {
            source_id: "src-1".to_string(),
            filename: name.to_string(),
            status: FileStatus::parse(status),
            is_duplicated: duplicated,
            rows: Some(10),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(detect_duplicated_and_failed_files(&[]).is_none());
    }

    #[test]
    fn test_clean_records_yield_nothing() {
        let a = record("a.csv", false, "processed");
        let b = record("b.csv", false, "");
        assert!(detect_duplicated_and_failed_files(&[&a, &b]).is_none());
    }

    #[test]
    fn test_matches_are_aggregated_in_order() {
        let a = record("a.csv", true, "processed");
        let b = record("b.csv", false, "processed");
        let c = record("c.csv", false, "Stopped");
        let d = record("d.csv", true, "STOPPED");
        let incident = detect_duplicated_and_failed_files(&[&a, &b, &c, &d]).unwrap();

        assert_eq!(incident.source_id, "src-1");
        assert_eq!(incident.incident_type, IncidentType::DuplicatedOrFailed);
        assert_eq!(incident.total_incidents, 3);
        assert_eq!(incident.files_to_review, vec!["a.csv", "c.csv", "d.csv"]);
        assert!(incident.incident_details.contains("2 flagged as duplicated"));
        assert!(incident.incident_details.contains("2 with status 'stopped'"));
    }

    #[test]
    fn test_is_idempotent() {
        let a = record("a.csv", true, "processed");
        let first = detect_duplicated_and_failed_files(&[&a]);
        let second = detect_duplicated_and_failed_files(&[&a]);
        assert_eq!(first, second);
    }
}
