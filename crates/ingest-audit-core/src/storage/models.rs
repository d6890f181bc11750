use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Processing status of an ingested file, normalized from free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileStatus {
    /// Ingestion was stopped; the file failed.
    Stopped,
    Other(String),
    #[default]
    Missing,
}

impl FileStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            FileStatus::Missing
        } else if trimmed.eq_ignore_ascii_case("stopped") {
            FileStatus::Stopped
        } else {
            FileStatus::Other(trimmed.to_string())
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, FileStatus::Stopped)
    }
}

impl<'de> Deserialize<'de> for FileStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| FileStatus::parse(&s)).unwrap_or_default())
    }
}

/// One row of ingestion metadata for a single file.
///
/// Every field except `source_id` tolerates missing or malformed input and falls
/// back to a value that never triggers a detector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileRecord {
    #[serde(deserialize_with = "de_text_id")]
    pub source_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub uploaded_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: FileStatus,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_duplicated: bool,
    #[serde(default, deserialize_with = "de_count")]
    pub rows: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub file_size: Option<u64>,
}

impl FileRecord {
    /// True only when the row count is known and equals zero.
    pub fn is_empty_file(&self) -> bool {
        self.rows == Some(0)
    }

    pub fn operation_date(&self) -> Option<NaiveDate> {
        self.uploaded_at.map(|ts| ts.date())
    }
}

/// Historical volume statistics for one source, mined offline ("CV data").
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceVolumeProfile {
    #[serde(deserialize_with = "de_source_id")]
    pub source_id: String,
    #[serde(default)]
    pub general_volume_stats: GeneralVolumeStats,
    #[serde(default)]
    pub day_of_week_row_stats: Vec<DayOfWeekStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneralVolumeStats {
    #[serde(default)]
    pub pct_empty_files: Option<f64>,
    #[serde(default)]
    pub median_rows: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DayOfWeekStats {
    /// `None` when the mined abbreviation is not a recognizable weekday.
    #[serde(default, deserialize_with = "de_weekday")]
    pub day: Option<Weekday>,
    #[serde(default)]
    pub empty_files_mean: Option<f64>,
}

impl SourceVolumeProfile {
    /// Historical mean of empty files for the given weekday, if mined.
    pub fn empty_files_mean_for(&self, weekday: Weekday) -> Option<f64> {
        self.day_of_week_row_stats
            .iter()
            .find(|stats| stats.day == Some(weekday))
            .and_then(|stats| stats.empty_files_mean)
            .filter(|mean| mean.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    #[serde(rename = "Duplicated or Failed File")]
    DuplicatedOrFailed,
    #[serde(rename = "Unexpected Empty File")]
    UnexpectedEmpty,
}

impl IncidentType {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::DuplicatedOrFailed => "Duplicated or Failed File",
            IncidentType::UnexpectedEmpty => "Unexpected Empty File",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One aggregated finding for one source and one detection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub source_id: String,
    pub incident_type: IncidentType,
    pub incident_details: String,
    pub total_incidents: usize,
    pub files_to_review: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

fn de_source_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Text(s)) => s.trim().to_string(),
        Some(RawScalar::Unsigned(n)) => n.to_string(),
        Some(RawScalar::Signed(n)) => n.to_string(),
        Some(RawScalar::Float(f)) => f.to_string(),
        Some(RawScalar::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

fn de_text_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).unwrap_or_default())
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Bool(b)) => b,
        Some(RawScalar::Unsigned(n)) => n == 1,
        Some(RawScalar::Signed(n)) => n == 1,
        Some(RawScalar::Float(f)) => f == 1.0,
        Some(RawScalar::Text(s)) => parse_flag(&s),
        None => false,
    })
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Unsigned(n)) => Some(n),
        Some(RawScalar::Signed(n)) => u64::try_from(n).ok(),
        Some(RawScalar::Float(f)) => count_from_float(f),
        Some(RawScalar::Text(s)) => parse_count(&s),
        Some(RawScalar::Bool(_)) | None => None,
    })
}

fn de_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn de_weekday<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Weekday>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<Weekday>().ok()))
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes" | "y"
    )
}

pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(count_from_float))
}

fn count_from_float(value: f64) -> Option<u64> {
    // Spreadsheet exports write integer columns with gaps as "12.0".
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Accepts the timestamp shapes seen in ingestion exports. Offsets are converted to UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.naive_utc());
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
