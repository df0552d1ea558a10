use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::filters::Filters;
use crate::model::RawTrack;

pub const BASE_SEARCH_URL: &str = "https://tracks.off-road.io/v1/tracks?limit=200&query=";
pub const BASE_LEGACY_SEARCH_URL: &str =
    "https://api.off-road.io/_ah/api/tracks/filter?activityType=OffRoading";
pub const BASE_BY_USER_URL: &str = "https://api.off-road.io/_ah/api/offroadApi/v2/getMoreByUser/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct LegacyResponse {
    items: Vec<TrackEnvelope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByUserResponse {
    #[serde(default)]
    user_display_name: Option<String>,
    track_results: Vec<TrackEnvelope>,
}

#[derive(Debug, Deserialize)]
struct TrackEnvelope {
    track: RawTrack,
}

pub fn search_url(query: &str) -> String {
    format!("{BASE_SEARCH_URL}{query}")
}

/// The legacy endpoint encodes the difficulty set as comma-joined tokens in a
/// fixed easy,moderate,hard order, and the area as a trailing parameter.
pub fn legacy_search_url(filters: &Filters) -> String {
    let mut url = String::from(BASE_LEGACY_SEARCH_URL);
    if !filters.difficulty_levels.is_empty() {
        let mut tokens = Vec::new();
        if filters.difficulty_levels.contains(&1) {
            tokens.push("easy");
        }
        if filters.difficulty_levels.contains(&3) {
            tokens.push("moderate");
        }
        if filters.difficulty_levels.contains(&5) {
            tokens.push("hard");
        }
        url.push_str("&diffLevel=");
        url.push_str(&tokens.join(","));
    }
    if let Some(area) = &filters.geo_area {
        url.push_str("&area=");
        url.push_str(area);
    }
    url
}

pub fn by_user_url(user_id: &str) -> String {
    format!("{BASE_BY_USER_URL}{user_id}")
}

async fn get_json<T: serde::de::DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;

    if !response.status().is_success() {
        bail!("GET {url} returned {}", response.status());
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("unexpected response shape from {url}"))
}

pub async fn fetch_primary(client: &reqwest::Client, query: &str) -> Result<Vec<RawTrack>> {
    let url = search_url(query);
    tracing::info!("Tracks URL: {url}");
    let response: SearchResponse = get_json(client, &url).await?;
    Ok(response.items)
}

pub async fn fetch_legacy(client: &reqwest::Client, filters: &Filters) -> Result<Vec<RawTrack>> {
    let url = legacy_search_url(filters);
    tracing::info!("Legacy URL: {url}");
    let response: LegacyResponse = get_json(client, &url).await?;
    Ok(response.items.into_iter().map(|item| item.track).collect())
}

/// Returns the display name the service reports for the user alongside the
/// records.
pub async fn fetch_by_user(
    client: &reqwest::Client,
    user_id: &str,
) -> Result<(Option<String>, Vec<RawTrack>)> {
    let url = by_user_url(user_id);
    tracing::info!("Tracks by user URL: {url}");
    let response: ByUserResponse = get_json(client, &url).await?;
    let tracks = response
        .track_results
        .into_iter()
        .map(|item| item.track)
        .collect();
    Ok((response.user_display_name, tracks))
}
