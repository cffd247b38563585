use super::{ApiClient, ApiError};
use crate::types::{Album, Body, FeaturedPlaylistsBody, NewReleasesResponse, Playlist};

impl ApiClient {
    /// Retrieves the editorial playlists (`GET /featured-playlists`).
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Vec<Playlist>)` - Featured playlists without embedded tracks
    /// - `Err(ApiError)` - Authentication, network or decoding failure
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn featured_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let response: Body<FeaturedPlaylistsBody> =
            self.get_json("/featured-playlists", &[]).await?;
        Ok(response.body.playlists.items)
    }

    /// Retrieves newly released albums (`GET /new-releases`).
    ///
    /// The albums come without track listings. Callers that need previews
    /// re-fetch them in full through [`ApiClient::albums`].
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Vec<Album>)` - New releases in the order the server lists them
    /// - `Err(ApiError)` - Authentication, network or decoding failure
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn new_releases(&self) -> Result<Vec<Album>, ApiError> {
        let response: NewReleasesResponse = self.get_json("/new-releases", &[]).await?;
        Ok(response.new_releases)
    }
}
