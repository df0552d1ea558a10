use chrono::{DateTime, Utc};
use serde_json::Number;

use crate::model::{RawId, RawTrack, SourceShape};

/// The one unconditional predicate: only off-roading tracks are eligible.
pub const REQUIRED_ACTIVITY: &str = "OffRoading";

/// The configured filter set for a run. Any axis left unset is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub query: Option<String>,
    pub user_id: Option<RawId>,
    pub min_grade: Option<f64>,
    pub min_reviews: Option<i64>,
    pub difficulty_levels: Vec<i64>,
    pub min_distance: Option<f64>,
    pub max_distance: Option<f64>,
    pub min_date: Option<DateTime<Utc>>,
    pub geo_area: Option<String>,
}

impl Filters {
    pub fn apply(&self, tracks: Vec<RawTrack>, shape: SourceShape) -> Vec<RawTrack> {
        tracks
            .into_iter()
            .filter(|t| self.accepts(t, shape))
            .collect()
    }

    pub fn accepts(&self, track: &RawTrack, shape: SourceShape) -> bool {
        if track.activity_type.as_deref() != Some(REQUIRED_ACTIVITY) {
            return false;
        }

        if !self.difficulty_levels.is_empty()
            && !track
                .difficulty_level
                .is_some_and(|lvl| self.difficulty_levels.contains(&lvl))
        {
            return false;
        }

        if let Some(area) = &self.geo_area {
            if track.area.as_deref() != Some(area.as_str()) {
                return false;
            }
        }

        // A track without a distance passes both bounds.
        let distance = track.resolved_distance(shape);
        if let Some(min) = self.min_distance {
            if distance.is_some_and(|d| d < min) {
                return false;
            }
        }
        if let Some(max) = self.max_distance {
            if distance.is_some_and(|d| d > max) {
                return false;
            }
        }

        if let Some(min) = self.min_grade {
            if !track
                .grade
                .as_ref()
                .and_then(Number::as_f64)
                .is_some_and(|g| g >= min)
            {
                return false;
            }
        }

        if let Some(min) = self.min_reviews {
            if !track.reviews.is_some_and(|r| r >= min) {
                return false;
            }
        }

        // Strictly after the minimum date; a record created exactly at the
        // minimum is excluded, and so is one with no parseable creation time.
        if let Some(min_date) = self.min_date {
            if !track
                .created
                .as_ref()
                .and_then(|ts| ts.to_utc())
                .is_some_and(|created| created > min_date)
            {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let hit = [&track.title, &track.description, &track.short_description]
                .into_iter()
                .any(|field| field.as_deref().is_some_and(|s| s.contains(query.as_str())));
            if !hit {
                return false;
            }
        }

        true
    }
}
