use super::{ApiClient, ApiError, BATCH_LOOKUP_LIMIT, fetch_in_chunks};
use crate::types::{Album, Body, Paging, SeveralAlbumsBody, Track};

impl ApiClient {
    /// Retrieves the tracks of a single album (`GET /album/{id}`).
    ///
    /// # Arguments
    ///
    /// * `id` - Album id
    ///
    /// # Returns
    ///
    /// Returns the album's tracks. They carry no album information of their
    /// own; `views::detail::album_tracks` attributes them.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn album_tracks(&self, id: &str) -> Result<Vec<Track>, ApiError> {
        let response: Body<Paging<Track>> = self.get_json(&format!("/album/{id}"), &[]).await?;
        Ok(response.body.items)
    }

    /// Full album objects, tracks included, for at most
    /// [`BATCH_LOOKUP_LIMIT`] ids (`GET /albums?albumIds=a,b`).
    ///
    /// # Arguments
    ///
    /// * `ids` - At most [`BATCH_LOOKUP_LIMIT`] album ids
    ///
    /// # Returns
    ///
    /// Returns the albums in the order of `ids`. Ids unknown upstream are
    /// answered with `null` and dropped.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn several_albums(&self, ids: &[String]) -> Result<Vec<Album>, ApiError> {
        debug_assert!(ids.len() <= BATCH_LOOKUP_LIMIT);
        let response: Body<SeveralAlbumsBody> = self
            .get_json("/albums", &[("albumIds", ids.join(","))])
            .await?;
        Ok(response.body.albums.into_iter().flatten().collect())
    }

    /// Batch album lookup for any number of ids, split into concurrent
    /// requests of at most [`BATCH_LOOKUP_LIMIT`] ids. Order is preserved.
    ///
    /// # Errors
    ///
    /// Fails as a whole when any chunk fails; no partial list is returned.
    pub async fn albums(&self, ids: &[String]) -> Result<Vec<Album>, ApiError> {
        fetch_in_chunks(ids, BATCH_LOOKUP_LIMIT, |chunk| async move {
            self.several_albums(&chunk).await
        })
        .await
    }
}
