use crate::{api::ApiError, management::CacheSlot, types::WeeklyDiscovery};

use super::Catalog;

/// Name of the personalised weekly playlist in the user's library.
pub const DISCOVER_WEEKLY: &str = "Discover Weekly";

/// The weekly discovery playlist and its tracks.
///
/// Looks the playlist up by name in the user's playlists, then fetches its
/// tracks. Both calls are skipped while the cached copy is fresh.
pub async fn load(catalog: &Catalog) -> Result<WeeklyDiscovery, ApiError> {
    let slot = CacheSlot::WeeklyDiscovery;
    let client = &catalog.client;

    catalog
        .cache
        .fetch_with_cache(slot.key(), slot.ttl(), || async move {
            let info = client
                .playlists()
                .await?
                .into_iter()
                .find(|p| p.name == DISCOVER_WEEKLY)
                .ok_or_else(|| ApiError::NotFound(DISCOVER_WEEKLY.to_string()))?;

            let tracks = client.playlist(&info.id).await?;
            Ok::<_, ApiError>(WeeklyDiscovery { info, tracks })
        })
        .await
}
