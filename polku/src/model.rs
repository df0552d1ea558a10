use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Which upstream shape a record came from. Legacy and ByUser responses keep
/// their distance nested under `layersStatistics`; the primary search carries
/// it directly on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    Primary,
    Legacy,
}

/// Source-assigned identifiers show up as both JSON numbers and strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Num(Number),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Num(n) => write!(f, "{n}"),
            RawId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// `created`/`updated` arrive as millisecond-epoch numbers or ISO strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(Number),
    Iso(String),
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        match self {
            Timestamp::Millis(n) => n
                .as_f64()
                .and_then(|ms| chrono::DateTime::from_timestamp_millis(ms as i64)),
            Timestamp::Iso(s) => parse_iso(s),
        }
    }
}

fn parse_iso(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    None
}

/// Durations are epoch-offset milliseconds, usually encoded as a numeric
/// string but occasionally as a plain number.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DurationMillis {
    Num(f64),
    Text(String),
}

impl DurationMillis {
    pub fn millis(&self) -> Option<i64> {
        match self {
            DurationMillis::Num(n) => Some(*n as i64),
            DurationMillis::Text(s) => s.trim().parse::<f64>().ok().map(|n| n as i64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayersStatistics {
    #[serde(default)]
    pub distance: Option<Number>,
}

/// A track record as the service returns it. Every field is optional so that
/// a record missing a field still deserializes; gaps surface as nulls in the
/// canonical output instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrack {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<i64>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub distance: Option<Number>,
    #[serde(default)]
    pub layers_statistics: Option<LayersStatistics>,
    #[serde(default)]
    pub grade: Option<Number>,
    #[serde(default)]
    pub reviews: Option<i64>,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
    #[serde(default)]
    pub duration: Option<DurationMillis>,
    #[serde(default)]
    pub owner_display_name: Option<String>,
}

impl RawTrack {
    /// Distance for filtering, resolved through the shape-specific accessor.
    pub fn resolved_distance(&self, shape: SourceShape) -> Option<f64> {
        let raw = match shape {
            SourceShape::Primary => self.distance.as_ref(),
            SourceShape::Legacy => self
                .layers_statistics
                .as_ref()
                .and_then(|s| s.distance.as_ref()),
        };
        raw.and_then(Number::as_f64)
    }
}

/// The canonical cross-source record, keyed by `url`. Field order here is the
/// serialized field order of every output file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub url: String,
    pub title: Option<String>,
    pub difficulty_level: String,
    pub distance: Option<Number>,
    pub duration: Option<String>,
    pub area: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub grade: Option<Number>,
    pub reviews: Option<i64>,
    pub owner_display_name: Option<String>,
    // Only Legacy/ByUser records carry these; primary-sourced records omit
    // the keys entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}
