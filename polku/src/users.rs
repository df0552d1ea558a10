use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::model::RawId;

/// One entry of the user directory file mapping a display name to the
/// internal id the ByUser endpoint expects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub owner_display_name: String,
    pub my_adventure_user_id: RawId,
}

/// Exact-match lookup of a display name. `Ok(None)` means the directory was
/// readable but has no such user; the ByUser pipeline is then skipped.
pub fn resolve_user_id(path: &Path, display_name: &str) -> Result<Option<RawId>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read users file {}", path.display()))?;
    let users: Vec<UserEntry> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse users file {}", path.display()))?;

    Ok(users
        .into_iter()
        .find(|u| u.owner_display_name == display_name)
        .map(|u| u.my_adventure_user_id))
}
