mod fetchers;
mod filters;
mod merge;
mod model;
mod normalize;
mod output;
mod users;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::filters::Filters;
use crate::merge::TrackSet;
use crate::model::{SourceShape, Track};

static EXAMPLES: &str = r"EXAMPLES:
    Hard and moderate Negev tracks, well reviewed, 20-60 km:
    polku --difficulty 3,5 --area NEGEV_NORTH --min-grade 4 --min-reviews 2 \
          --min-distance 20 --max-distance 60 --min-date 2018-01-01

    Everything a given user published, merged with the search results:
    polku --user 'shay lazmi' --users-file input/user-ids.json

    Free-text search only:
    polku --query 'makhtesh'";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Aggregate off-road.io tracks from all three search endpoints into one deduplicated JSON file",
    long_about = None,
    after_help = EXAMPLES
)]
struct Args {
    /// Free-text search query (case-sensitive substring match)
    #[arg(long)]
    query: Option<String>,

    /// Owner display name, resolved to a user id through the users file
    #[arg(long)]
    user: Option<String>,

    /// User directory JSON mapping display names to user ids
    #[arg(long, default_value = "input/user-ids.json")]
    users_file: PathBuf,

    /// Minimum track grade
    #[arg(long)]
    min_grade: Option<f64>,

    /// Minimum review count
    #[arg(long)]
    min_reviews: Option<i64>,

    /// Allowed difficulty levels (1 = easy, 3 = moderate, 5 = hard)
    #[arg(long, value_delimiter = ',')]
    difficulty: Vec<i64>,

    /// Minimum distance, inclusive
    #[arg(long)]
    min_distance: Option<f64>,

    /// Maximum distance, inclusive
    #[arg(long)]
    max_distance: Option<f64>,

    /// Keep only tracks created strictly after this date (YYYY-MM-DD, UTC)
    #[arg(long)]
    min_date: Option<NaiveDate>,

    /// Geographic area tag, exact match (e.g. NEGEV_NORTH)
    #[arg(long)]
    area: Option<String>,

    /// Output directory
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

fn build_filters(args: &Args) -> Result<Filters> {
    let user_id = match &args.user {
        Some(name) => {
            let id = users::resolve_user_id(&args.users_file, name)?;
            if id.is_none() {
                tracing::warn!(
                    "no user named {name:?} in {}, skipping the by-user fetch",
                    args.users_file.display()
                );
            }
            id
        }
        None => None,
    };

    Ok(Filters {
        query: args.query.clone().filter(|q| !q.is_empty()),
        user_id,
        min_grade: args.min_grade,
        min_reviews: args.min_reviews,
        difficulty_levels: args.difficulty.clone(),
        min_distance: args.min_distance,
        max_distance: args.max_distance,
        min_date: args
            .min_date
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc()),
        geo_area: args.area.clone(),
    })
}

async fn run_primary(
    client: &reqwest::Client,
    filters: &Filters,
    out_dir: &Path,
) -> Result<Vec<Track>> {
    let raw = fetchers::fetch_primary(client, filters.query.as_deref().unwrap_or("")).await?;
    tracing::info!("Initial tracks count = {}", raw.len());

    let raw = filters.apply(raw, SourceShape::Primary);
    tracing::info!("Tracks count = {}", raw.len());
    output::write_json_pretty(&out_dir.join("raw/tracks-raw.json"), &raw)?;

    let tracks: Vec<Track> = raw.iter().map(normalize::normalize_primary).collect();
    output::write_json_pretty(&out_dir.join("partial/tracks.json"), &tracks)?;

    Ok(tracks)
}

async fn run_legacy(
    client: &reqwest::Client,
    filters: &Filters,
    out_dir: &Path,
) -> Result<Vec<Track>> {
    let raw = fetchers::fetch_legacy(client, filters).await?;
    tracing::info!("Initial legacy tracks count = {}", raw.len());

    let raw = filters.apply(raw, SourceShape::Legacy);
    tracing::info!("Legacy tracks count = {}", raw.len());
    output::write_json_pretty(&out_dir.join("raw/legacy-tracks-raw.json"), &raw)?;

    let tracks: Vec<Track> = raw.iter().map(normalize::normalize_legacy).collect();
    output::write_json_pretty(&out_dir.join("partial/legacy-tracks.json"), &tracks)?;

    Ok(tracks)
}

async fn run_by_user(
    client: &reqwest::Client,
    filters: &Filters,
    out_dir: &Path,
) -> Result<Vec<Track>> {
    // Not an error: without a configured user id this pipeline contributes
    // nothing.
    let Some(user_id) = &filters.user_id else {
        return Ok(Vec::new());
    };

    let (display_name, raw) = fetchers::fetch_by_user(client, &user_id.to_string()).await?;
    tracing::info!(
        "Initial tracks by user [{}] count = {}",
        display_name.as_deref().unwrap_or("unknown"),
        raw.len()
    );

    let raw = filters.apply(raw, SourceShape::Legacy);
    tracing::info!("Tracks by user count = {}", raw.len());
    output::write_json_pretty(&out_dir.join("raw/tracks-by-user-raw.json"), &raw)?;

    let tracks: Vec<Track> = raw.iter().map(normalize::normalize_legacy).collect();
    output::write_json_pretty(&out_dir.join("partial/tracks-by-user.json"), &tracks)?;

    Ok(tracks)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let filters = build_filters(&args)?;
    output::ensure_dirs(&args.out_dir)?;

    let client = reqwest::Client::new();

    // Settle-all: each pipeline runs to completion on its own; one failing
    // never cancels the others.
    let (primary, legacy, by_user) = tokio::join!(
        run_primary(&client, &filters, &args.out_dir),
        run_legacy(&client, &filters, &args.out_dir),
        run_by_user(&client, &filters, &args.out_dir),
    );

    // Merge order fixes field precedence: primary first, so its values win
    // for tracks found by more than one source.
    let mut all_tracks = TrackSet::new();
    for (source, outcome) in [
        ("tracks", primary),
        ("legacy tracks", legacy),
        ("tracks by user", by_user),
    ] {
        match outcome {
            Ok(tracks) => all_tracks.merge(tracks),
            Err(e) => tracing::warn!("{source} pipeline failed: {e:#}"),
        }
    }

    tracing::info!("Unique tracks count: {}", all_tracks.len());
    output::write_json_pretty(&args.out_dir.join("all-tracks.json"), &all_tracks.into_sorted())?;

    Ok(())
}
