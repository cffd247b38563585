use serde::{Deserialize, Serialize};

use crate::{
    api::ApiError,
    management::CacheSlot,
    types::{SearchResults, Track},
};

use super::Catalog;

/// Search response as cached, tagged with the term it answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedSearch {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub results: SearchResults,
}

/// Search results for `term`, or `None` for an empty term.
///
/// A cached response is only served for the exact same term (case and
/// whitespace included). On a miss the combined search runs first and the
/// returned track ids are then looked up in full; the full tracks replace the
/// search's own track list.
pub async fn load(catalog: &Catalog, term: &str) -> Result<Option<SearchResults>, ApiError> {
    if term.is_empty() {
        return Ok(None);
    }

    let slot = CacheSlot::SearchResults;
    let client = &catalog.client;

    let cached = catalog
        .cache
        .fetch_with_cache_if(
            slot.key(),
            slot.ttl(),
            || async move {
                let found = client.search_all(term).await?;

                let ids: Vec<String> = found
                    .tracks
                    .items
                    .iter()
                    .map(|t| t.id.clone())
                    .filter(|id| !id.is_empty())
                    .collect();
                let tracks: Vec<Track> = if ids.is_empty() {
                    Vec::new()
                } else {
                    client.tracks(&ids).await?
                };

                Ok::<_, ApiError>(CachedSearch {
                    search_term: term.to_string(),
                    results: SearchResults {
                        tracks,
                        albums: found.albums.items,
                        playlists: found.playlists.items,
                        artists: found.artists.items,
                    },
                })
            },
            |cached: &CachedSearch| cached.search_term == term,
        )
        .await?;

    Ok(Some(cached.results))
}
