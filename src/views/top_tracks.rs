use crate::{api::ApiError, management::CacheSlot, types::Track};

use super::Catalog;

pub async fn load(catalog: &Catalog) -> Result<Vec<Track>, ApiError> {
    let slot = CacheSlot::TopTracks;
    let client = &catalog.client;
    catalog
        .cache
        .fetch_with_cache(slot.key(), slot.ttl(), || client.top_tracks())
        .await
}
