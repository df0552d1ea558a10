use std::cmp::Ordering;

use crate::model::Track;

/// The merged, URL-deduplicated collection. Owned by main and only mutated
/// after the concurrent fetches have settled, so merging is serialized.
#[derive(Debug, Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Merge a batch of normalized records. An unseen URL appends; a known
    /// URL only fills in fields the stored record lacks, so values from
    /// earlier-merged sources always win.
    pub fn merge(&mut self, incoming: Vec<Track>) {
        for track in incoming {
            match self.tracks.iter_mut().find(|t| t.url == track.url) {
                None => self.tracks.push(track),
                Some(existing) => fill_missing(existing, track),
            }
        }
    }

    /// Consume the set, ordered by title; records without a title sort last.
    pub fn into_sorted(mut self) -> Vec<Track> {
        self.tracks
            .sort_by(|a, b| compare_titles(a.title.as_deref(), b.title.as_deref()));
        self.tracks
    }
}

fn fill_missing(existing: &mut Track, incoming: Track) {
    if existing.title.is_none() {
        existing.title = incoming.title;
    }
    if existing.distance.is_none() {
        existing.distance = incoming.distance;
    }
    if existing.duration.is_none() {
        existing.duration = incoming.duration;
    }
    if existing.area.is_none() {
        existing.area = incoming.area;
    }
    if existing.created.is_none() {
        existing.created = incoming.created;
    }
    if existing.updated.is_none() {
        existing.updated = incoming.updated;
    }
    if existing.grade.is_none() {
        existing.grade = incoming.grade;
    }
    if existing.reviews.is_none() {
        existing.reviews = incoming.reviews;
    }
    if existing.owner_display_name.is_none() {
        existing.owner_display_name = incoming.owner_display_name;
    }
    if existing.description.is_none() {
        existing.description = incoming.description;
    }
    if existing.short_description.is_none() {
        existing.short_description = incoming.short_description;
    }
}

fn compare_titles(a: Option<&str>, b: Option<&str>) -> Ordering {
    // Empty counts as missing, and missing sorts after everything else.
    let a = a.filter(|s| !s.is_empty());
    let b = b.filter(|s| !s.is_empty());
    match (a, b) {
        (Some(a), Some(b)) => {
            let folded = a.to_lowercase().cmp(&b.to_lowercase());
            if folded == Ordering::Equal { a.cmp(b) } else { folded }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
