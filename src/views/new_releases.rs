use crate::{api::ApiError, management::CacheSlot, types::Album};

use super::Catalog;

/// New releases with full album objects.
///
/// The release listing carries no track lists, so every album is looked up
/// again through the chunked batch endpoint. The combined list is cached as a
/// whole; a failed chunk fails the load and leaves the cache alone.
pub async fn load(catalog: &Catalog) -> Result<Vec<Album>, ApiError> {
    let slot = CacheSlot::NewReleases;
    let client = &catalog.client;

    catalog
        .cache
        .fetch_with_cache(slot.key(), slot.ttl(), || async move {
            let ids: Vec<String> = client
                .new_releases()
                .await?
                .into_iter()
                .map(|album| album.id)
                .filter(|id| !id.is_empty())
                .collect();

            if ids.is_empty() {
                return Ok::<_, ApiError>(Vec::new());
            }
            client.albums(&ids).await
        })
        .await
}
