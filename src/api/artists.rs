use super::{ApiClient, ApiError};
use crate::types::{ArtistDetailBody, Body};

impl ApiClient {
    /// Retrieves an artist profile (`GET /artist/{id}`).
    ///
    /// # Arguments
    ///
    /// * `id` - Artist id
    ///
    /// # Returns
    ///
    /// Returns the artist together with their top tracks, related artists
    /// and albums. The albums are simplified objects without tracks.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when no valid token could be obtained
    /// - [`ApiError::Http`] on transport errors or a non-success status
    pub async fn artist(&self, id: &str) -> Result<ArtistDetailBody, ApiError> {
        let response: Body<ArtistDetailBody> =
            self.get_json(&format!("/artist/{id}"), &[]).await?;
        Ok(response.body)
    }
}
