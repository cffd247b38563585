use super::{ApiClient, ApiError};
use crate::types::{
    Body, Playlist, PlaylistDetailResponse, PlaylistItem, PlaylistTracksBody, PlaylistsResponse,
    Track,
};

fn into_tracks(items: Vec<PlaylistItem>) -> Vec<Track> {
    items.into_iter().filter_map(|item| item.track).collect()
}

impl ApiClient {
    /// Retrieves the current user's playlists (`GET /playlists`).
    ///
    /// The list is used to find the weekly discovery playlist by name. Only
    /// playlist metadata is returned; tracks are fetched separately with
    /// [`ApiClient::playlist`].
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Vec<Playlist>)` - The user's playlists, `null` entries dropped
    /// - `Err(ApiError)` - Authentication, network or decoding failure
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let response: PlaylistsResponse = self.get_json("/playlists", &[]).await?;
        Ok(response.playlists)
    }

    /// Retrieves the tracks of one of the user's playlists
    /// (`GET /playlist/{id}`).
    ///
    /// # Arguments
    ///
    /// * `id` - Playlist id as listed by [`ApiClient::playlists`]
    ///
    /// # Returns
    ///
    /// Returns the playlist's tracks in playlist order. Entries whose track
    /// was removed upstream come back as `null` and are skipped.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn playlist(&self, id: &str) -> Result<Vec<Track>, ApiError> {
        let response: PlaylistDetailResponse =
            self.get_json(&format!("/playlist/{id}"), &[]).await?;
        Ok(into_tracks(response.playlist_tracks))
    }

    /// Retrieves the tracks of any playlist, e.g. a featured or searched one
    /// (`GET /playlist-tracks/{id}`).
    ///
    /// # Arguments
    ///
    /// * `id` - Playlist id
    ///
    /// # Returns
    ///
    /// Returns the playlist's tracks; removed entries are skipped as in
    /// [`ApiClient::playlist`].
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn playlist_tracks(&self, id: &str) -> Result<Vec<Track>, ApiError> {
        let response: Body<PlaylistTracksBody> =
            self.get_json(&format!("/playlist-tracks/{id}"), &[]).await?;
        Ok(into_tracks(response.body.tracks.items))
    }
}
