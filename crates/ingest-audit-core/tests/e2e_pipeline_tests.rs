use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

use ingest_audit_core::{
    AppConfig, AuditEngine, EmptyFilePolicy, Error, IncidentRecord, IncidentType,
    ProgressReporter, SilentReporter,
};

/// Listing for 2025-09-08 (a Monday) plus one stale row from the day before.
///   101: one duplicated file, one stopped file, two empty files (Monday mean 0.4)
///   202: one empty file, no weekday stats, median 300 rows
///   303: one empty file, not profiled at all
const LISTING: &str = "\
source_id,filename,uploaded_at,status,is_duplicated,rows,file_size
101,101_a.csv,2025-09-08 01:00:00,processed,False,500,10240
101,101_b.csv,2025-09-08 02:00:00,processed,True,500,10240
101,101_c.csv,2025-09-08 03:00:00,Stopped,False,,0
101,101_d.csv,2025-09-08 04:00:00,processed,False,0,0
101,101_e.csv,2025-09-08 05:00:00,processed,False,0,0
202,202_a.csv,2025-09-08 06:00:00,processed,False,0,0
303,303_a.csv,2025-09-08T07:00:00,processed,False,0,0
202,202_old.csv,2025-09-07 23:00:00,stopped,True,0,0
";

const CV_DATA: &str = r#"[
  {
    "source_id": 101,
    "general_volume_stats": {"pct_empty_files": 0.05, "median_rows": 480},
    "day_of_week_row_stats": [
      {"day": "Sun", "empty_files_mean": 3.0},
      {"day": "Mon", "empty_files_mean": 0.4}
    ]
  },
  {
    "source_id": "202",
    "general_volume_stats": {"pct_empty_files": 0.0, "median_rows": 300},
    "day_of_week_row_stats": []
  }
]"#;

fn write_fixtures(root: &Path) -> AppConfig {
    let files_path = root.join("files.csv");
    let cv_path = root.join("cv_data.json");
    fs::write(&files_path, LISTING).unwrap();
    fs::write(&cv_path, CV_DATA).unwrap();

    AppConfig {
        operation_date: Some("2025-09-08".to_string()),
        output_dir: root.join("outputs").to_string_lossy().into_owned(),
        files_path: files_path.to_string_lossy().into_owned(),
        cv_data_path: Some(cv_path.to_string_lossy().into_owned()),
        policy: EmptyFilePolicy::default(),
    }
}

#[test]
fn test_full_pipeline_writes_report() {
    let dir = tempdir().unwrap();
    let config = write_fixtures(dir.path());

    let result = AuditEngine::new(config).run(&SilentReporter).unwrap();

    assert_eq!(result.files_audited, 7);
    assert_eq!(result.sources_audited, 3);
    assert_eq!(result.skipped_rows, 0);

    let kinds: Vec<(&str, IncidentType, usize)> = result
        .incidents
        .iter()
        .map(|i| (i.source_id.as_str(), i.incident_type, i.total_incidents))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("101", IncidentType::DuplicatedOrFailed, 2),
            ("101", IncidentType::UnexpectedEmpty, 2),
            ("202", IncidentType::UnexpectedEmpty, 1),
            ("303", IncidentType::UnexpectedEmpty, 1),
        ]
    );
    assert_eq!(
        result.incidents[0].files_to_review,
        vec!["101_b.csv", "101_c.csv"]
    );

    let report_path = result.report_path.expect("report should be written");
    assert!(report_path.ends_with("2025-09-08_incidents_report.json"));
    let written: Vec<IncidentRecord> =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(written, result.incidents);
}

#[test]
fn test_lenient_policy_suppresses_weekday_incident() {
    let dir = tempdir().unwrap();
    let config = write_fixtures(dir.path());
    let policy = EmptyFilePolicy {
        tolerance: 2,
        median_rows_floor: 1000,
    };

    let result = AuditEngine::new(config)
        .with_policy(policy)
        .run(&SilentReporter)
        .unwrap();

    // 101: 2 empties <= round(0.4) + 2; 202: median 300 <= 1000; 303 still unprofiled.
    let sources: Vec<(&str, IncidentType)> = result
        .incidents
        .iter()
        .map(|i| (i.source_id.as_str(), i.incident_type))
        .collect();
    assert_eq!(
        sources,
        vec![
            ("101", IncidentType::DuplicatedOrFailed),
            ("303", IncidentType::UnexpectedEmpty),
        ]
    );
}

#[test]
fn test_clean_day_writes_no_report() {
    let dir = tempdir().unwrap();
    let mut config = write_fixtures(dir.path());
    let listing = "source_id,filename,uploaded_at,status,is_duplicated,rows\n\
                   101,ok.csv,2025-09-08 01:00:00,processed,False,42\n";
    fs::write(&config.files_path, listing).unwrap();
    config.output_dir = dir.path().join("clean").to_string_lossy().into_owned();

    let result = AuditEngine::new(config).run(&SilentReporter).unwrap();
    assert!(result.incidents.is_empty());
    assert!(result.report_path.is_none());
    assert!(!dir.path().join("clean").exists());
}

#[test]
fn test_missing_cv_data_aborts_run() {
    let dir = tempdir().unwrap();
    let mut config = write_fixtures(dir.path());
    config.cv_data_path = Some(dir.path().join("absent.json").to_string_lossy().into_owned());

    let err = AuditEngine::new(config).run(&SilentReporter).unwrap_err();
    assert!(matches!(err, Error::MissingData { what: "CV data", .. }));
}

#[test]
fn test_missing_listing_aborts_run() {
    let dir = tempdir().unwrap();
    let mut config = write_fixtures(dir.path());
    config.files_path = dir.path().join("absent.csv").to_string_lossy().into_owned();

    let err = AuditEngine::new(config).run(&SilentReporter).unwrap_err();
    assert!(matches!(err, Error::MissingData { what: "File listing", .. }));
}

#[test]
fn test_invalid_date_aborts_run() {
    let dir = tempdir().unwrap();
    let mut config = write_fixtures(dir.path());
    config.operation_date = Some("yesterday".to_string());

    let err = AuditEngine::new(config).run(&SilentReporter).unwrap_err();
    assert!(matches!(err, Error::InvalidDate(_)));
}

#[derive(Default)]
struct CountingReporter {
    sources: AtomicUsize,
    incidents: AtomicUsize,
    reports: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn on_source_audited(&self, _source_id: &str, incidents: usize) {
        self.sources.fetch_add(1, Ordering::SeqCst);
        self.incidents.fetch_add(incidents, Ordering::SeqCst);
    }

    fn on_report_written(&self, _path: &Path, _duration_secs: f64) {
        self.reports.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_reporter_sees_every_source() {
    let dir = tempdir().unwrap();
    let config = write_fixtures(dir.path());
    let reporter = CountingReporter::default();

    AuditEngine::new(config).run(&reporter).unwrap();

    assert_eq!(reporter.sources.load(Ordering::SeqCst), 3);
    assert_eq!(reporter.incidents.load(Ordering::SeqCst), 4);
    assert_eq!(reporter.reports.load(Ordering::SeqCst), 1);
}
