use crate::error::Error;
use crate::storage::models::FileRecord;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// The day's file listing, already scoped to one operation date.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    operation_date: NaiveDate,
    records: Vec<FileRecord>,
    skipped_rows: usize,
}

impl FileRecordStore {
    /// Keep only the records uploaded on `operation_date`, preserving order.
    pub fn from_records(operation_date: NaiveDate, records: Vec<FileRecord>) -> Self {
        let total = records.len();
        let records: Vec<FileRecord> = records
            .into_iter()
            .filter(|record| record.operation_date() == Some(operation_date))
            .collect();
        debug!(
            "{} of {} records belong to {}",
            records.len(),
            total,
            operation_date
        );

        Self {
            operation_date,
            records,
            skipped_rows: 0,
        }
    }

    pub fn from_csv_path(path: &Path, operation_date: NaiveDate) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::MissingData {
                what: "File listing",
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, operation_date)
    }

    /// Read a CSV listing with a header row. Column order is free and unknown
    /// columns are ignored. Rows that cannot be read at all are skipped and counted.
    pub fn from_csv_reader<R: io::Read>(reader: R, operation_date: NaiveDate) -> Result<Self, Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut parsed = Vec::new();
        let mut skipped_rows = 0;

        for (line, result) in csv_reader.deserialize::<FileRecord>().enumerate() {
            match result {
                Ok(record) => {
                    if record.uploaded_at.is_none() {
                        warn!(
                            "Row {} ('{}') has no readable upload timestamp, skipping",
                            line + 2,
                            record.filename
                        );
                        skipped_rows += 1;
                        continue;
                    }
                    parsed.push(record);
                }
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    warn!("Skipping unreadable row {}: {}", line + 2, err);
                    skipped_rows += 1;
                }
            }
        }

        let mut store = Self::from_records(operation_date, parsed);
        store.skipped_rows = skipped_rows;
        Ok(store)
    }

    pub fn operation_date(&self) -> NaiveDate {
        self.operation_date
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped while loading because they could not be read or dated.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn for_source(&self, source_id: &str) -> Vec<&FileRecord> {
        self.records
            .iter()
            .filter(|record| record.source_id == source_id)
            .collect()
    }

    /// Records grouped by source, each group in original order.
    pub fn by_source(&self) -> HashMap<&str, Vec<&FileRecord>> {
        let mut groups: HashMap<&str, Vec<&FileRecord>> = HashMap::new();
        for record in &self.records {
            groups
                .entry(record.source_id.as_str())
                .or_default()
                .push(record);
        }
        groups
    }

    /// Distinct source ids in first-appearance order.
    pub fn source_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.source_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
