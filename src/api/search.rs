use super::{ApiClient, ApiError};
use crate::types::{Body, SearchAllBody};

/// Categories requested from the combined search.
pub const SEARCH_TYPES: &str = "album,playlist,track,artist";

/// Results per category.
pub const SEARCH_LIMIT: u32 = 10;

impl ApiClient {
    /// Runs the combined search across albums, playlists, tracks and
    /// artists (`GET /search-all`).
    ///
    /// # Arguments
    ///
    /// * `term` - Search term, sent as given
    ///
    /// # Returns
    ///
    /// Returns up to [`SEARCH_LIMIT`] results per category. The tracks are
    /// simplified objects; callers look them up in full with
    /// [`ApiClient::tracks`] to get preview urls.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn search_all(&self, term: &str) -> Result<SearchAllBody, ApiError> {
        let response: Body<SearchAllBody> = self
            .get_json(
                "/search-all",
                &[
                    ("searchTerm", term.to_string()),
                    ("types", SEARCH_TYPES.to_string()),
                    ("limit", SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(response.body)
    }
}
