use super::{ApiClient, ApiError, BATCH_LOOKUP_LIMIT, fetch_in_chunks};
use crate::types::{Body, SeveralTracksBody, TopTracksResponse, Track};

impl ApiClient {
    /// Retrieves the user's top tracks (`GET /top-tracks`).
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Vec<Track>)` - Top tracks, most played first
    /// - `Err(ApiError)` - Authentication, network or decoding failure
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn top_tracks(&self) -> Result<Vec<Track>, ApiError> {
        let response: TopTracksResponse = self.get_json("/top-tracks", &[]).await?;
        Ok(response.top_tracks)
    }

    /// Retrieves full track objects for any number of ids
    /// (`GET /get-tracks?trackIds=a,b`).
    ///
    /// # Arguments
    ///
    /// * `ids` - Track ids; split into requests of at most
    ///   [`BATCH_LOOKUP_LIMIT`] ids that run concurrently
    ///
    /// # Returns
    ///
    /// Returns the tracks in the order of `ids`. Ids unknown upstream are
    /// answered with `null` and dropped.
    ///
    /// # Errors
    ///
    /// Fails as a whole when any chunk fails; no partial list is returned.
    pub async fn tracks(&self, ids: &[String]) -> Result<Vec<Track>, ApiError> {
        fetch_in_chunks(ids, BATCH_LOOKUP_LIMIT, |chunk| async move {
            let response: Body<SeveralTracksBody> = self
                .get_json("/get-tracks", &[("trackIds", chunk.join(","))])
                .await?;
            Ok::<_, ApiError>(response.body.tracks.into_iter().flatten().collect())
        })
        .await
    }
}
