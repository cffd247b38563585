use crate::{api::ApiError, management::CacheSlot, types::Playlist};

use super::Catalog;

pub async fn load(catalog: &Catalog) -> Result<Vec<Playlist>, ApiError> {
    let slot = CacheSlot::FeaturedPlaylists;
    let client = &catalog.client;
    catalog
        .cache
        .fetch_with_cache(slot.key(), slot.ttl(), || client.featured_playlists())
        .await
}
