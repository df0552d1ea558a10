use serde_json::Number;

use crate::model::{RawTrack, Timestamp, Track};

pub const BASE_TRACK_URL: &str = "https://off-road.io/track/";

pub fn difficulty_label(level: Option<i64>) -> &'static str {
    match level {
        Some(5) => "Hard",
        Some(3) => "Moderate",
        Some(1) => "Easy",
        _ => "N/A",
    }
}

/// The duration field is a millisecond offset from epoch; the displayed value
/// is its time-of-day component. Offsets of a day or more wrap, matching the
/// upstream encoding.
fn format_duration(millis: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.format("%H:%M:%S").to_string())
}

fn format_date(ts: &Timestamp) -> Option<String> {
    ts.to_utc().map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn track_url(track: &RawTrack) -> String {
    match &track.id {
        Some(id) => format!("{BASE_TRACK_URL}{id}"),
        None => BASE_TRACK_URL.to_string(),
    }
}

/// Map a primary-shape record into the canonical shape. Pure: same input,
/// same output.
pub fn normalize_primary(track: &RawTrack) -> Track {
    Track {
        url: track_url(track),
        title: track.title.clone(),
        difficulty_level: difficulty_label(track.difficulty_level).to_string(),
        distance: track
            .distance
            .as_ref()
            .and_then(Number::as_f64)
            .map(|d| Number::from(d.trunc() as i64)),
        duration: track
            .duration
            .as_ref()
            .and_then(|d| d.millis())
            .and_then(format_duration),
        area: track.area.clone(),
        created: track.created.as_ref().and_then(format_date),
        updated: track.updated.as_ref().and_then(format_date),
        grade: track.grade.clone(),
        reviews: track.reviews,
        owner_display_name: track.owner_display_name.clone(),
        description: None,
        short_description: None,
    }
}

/// Legacy/ByUser records share the primary mapping, but the distance comes
/// from the nested statistics (untruncated) and the two description fields
/// pass through.
pub fn normalize_legacy(track: &RawTrack) -> Track {
    let mut mapped = normalize_primary(track);
    mapped.distance = track
        .layers_statistics
        .as_ref()
        .and_then(|s| s.distance.clone());
    mapped.description = track.description.clone();
    mapped.short_description = track.short_description.clone();
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_labels() {
        assert_eq!(difficulty_label(Some(5)), "Hard");
        assert_eq!(difficulty_label(Some(3)), "Moderate");
        assert_eq!(difficulty_label(Some(1)), "Easy");
        assert_eq!(difficulty_label(Some(2)), "N/A");
        assert_eq!(difficulty_label(None), "N/A");
    }

    #[test]
    fn primary_mapping() {
        let raw: RawTrack = serde_json::from_value(json!({
            "id": 981,
            "title": "Makhtesh Ramon rim",
            "activityType": "OffRoading",
            "difficultyLevel": 5,
            "area": "NEGEV_CENTER_MACHTESHIM",
            "distance": 42.7,
            "grade": 4.5,
            "reviews": 12,
            "created": 1514764800000i64,
            "updated": "2019-05-04T12:30:00Z",
            "duration": "3600000",
            "ownerDisplayName": "noga"
        }))
        .unwrap();

        let track = normalize_primary(&raw);
        assert_eq!(track.url, "https://off-road.io/track/981");
        assert_eq!(track.title.as_deref(), Some("Makhtesh Ramon rim"));
        assert_eq!(track.difficulty_level, "Hard");
        assert_eq!(track.distance, Some(Number::from(42)));
        assert_eq!(track.duration.as_deref(), Some("01:00:00"));
        assert_eq!(track.created.as_deref(), Some("2018-01-01"));
        assert_eq!(track.updated.as_deref(), Some("2019-05-04"));
        assert_eq!(track.reviews, Some(12));
        assert_eq!(track.owner_display_name.as_deref(), Some("noga"));
        // Primary records never carry the description fields.
        assert!(track.description.is_none());
        assert!(track.short_description.is_none());
    }

    #[test]
    fn primary_mapping_is_pure() {
        let raw: RawTrack = serde_json::from_value(json!({
            "id": "x1",
            "title": "twice",
            "duration": "5400000",
            "created": 1514764800000i64
        }))
        .unwrap();

        let first = serde_json::to_string(&normalize_primary(&raw)).unwrap();
        let second = serde_json::to_string(&normalize_primary(&raw)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_fields_become_nulls_not_errors() {
        let track = normalize_primary(&RawTrack::default());
        assert_eq!(track.url, BASE_TRACK_URL);
        assert!(track.title.is_none());
        assert_eq!(track.difficulty_level, "N/A");
        assert!(track.distance.is_none());
        assert!(track.duration.is_none());
        assert!(track.created.is_none());
    }

    #[test]
    fn legacy_overrides_distance_and_passes_descriptions_through() {
        let raw: RawTrack = serde_json::from_value(json!({
            "id": 55,
            "title": "wadi crossing",
            "description": "full notes",
            "shortDescription": "short notes",
            "distance": 99.9,
            "layersStatistics": { "distance": 31.4 }
        }))
        .unwrap();

        let track = normalize_legacy(&raw);
        // Nested value wins, untruncated.
        assert_eq!(track.distance, Number::from_f64(31.4));
        assert_eq!(track.description.as_deref(), Some("full notes"));
        assert_eq!(track.short_description.as_deref(), Some("short notes"));
    }

    #[test]
    fn legacy_distance_is_null_without_statistics() {
        let raw: RawTrack = serde_json::from_value(json!({
            "id": 56,
            "distance": 12.0
        }))
        .unwrap();

        let track = normalize_legacy(&raw);
        assert!(track.distance.is_none());
    }

    #[test]
    fn duration_wraps_at_a_day() {
        let raw: RawTrack = serde_json::from_value(json!({
            "id": 1,
            "duration": "90061000"
        }))
        .unwrap();

        // 25h 1m 1s keeps only the time-of-day component.
        assert_eq!(normalize_primary(&raw).duration.as_deref(), Some("01:01:01"));
    }
}
