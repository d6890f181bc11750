use crate::detection::EmptyFilePolicy;
use crate::storage::models::{FileRecord, IncidentRecord, IncidentType, SourceVolumeProfile};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Flag zero-row files that the source's history does not explain.
///
/// Exactly one policy applies per call:
/// 1. no profile: every empty file is flagged as a precaution;
/// 2. weekday mean mined: flag when today's count exceeds the rounded mean plus the tolerance;
/// 3. otherwise: flag when the source's median row count is above the floor.
///
/// When the batch is flagged, every empty file of the source is listed for review.
pub fn detect_unexpected_empty_files(
    records: &[&FileRecord],
    profile: Option<&SourceVolumeProfile>,
    operation_date: NaiveDate,
    policy: &EmptyFilePolicy,
) -> Option<IncidentRecord> {
    let empty: Vec<&FileRecord> = records
        .iter()
        .copied()
        .filter(|record| record.is_empty_file())
        .collect();

    let Some(first) = empty.first() else {
        debug!("No empty files among {} records", records.len());
        return None;
    };
    let today = empty.len();

    let details = match profile {
        None => format!(
            "{} empty file(s) received and no historical data exists for this source; flagged as a precaution.",
            today
        ),
        Some(profile) => {
            let weekday = operation_date.weekday();
            if let Some(mean) = profile.empty_files_mean_for(weekday) {
                let ceiling = mean.round_ties_even() + policy.tolerance as f64;
                if (today as f64) <= ceiling {
                    debug!(
                        "{} empty file(s) within historical {} mean of {:.2} for source '{}'",
                        today, weekday, mean, first.source_id
                    );
                    return None;
                }
                format!(
                    "{} empty file(s) received, above the historical mean of {:.2} for {}.",
                    today, mean, weekday
                )
            } else {
                match profile
                    .general_volume_stats
                    .median_rows
                    .filter(|median| median.is_finite())
                {
                    Some(median) if median > policy.median_rows_floor as f64 => format!(
                        "{} empty file(s) received from a source whose files carry a median of {} rows.",
                        today, median
                    ),
                    _ => {
                        debug!(
                            "No weekday mean and no substantial median for source '{}', {} empty file(s) accepted",
                            first.source_id, today
                        );
                        return None;
                    }
                }
            }
        }
    };

    Some(IncidentRecord {
        source_id: first.source_id.clone(),
        incident_type: IncidentType::UnexpectedEmpty,
        incident_details: details,
        total_incidents: today,
        files_to_review: empty.iter().map(|r| r.filename.clone()).collect(),
    })
}
