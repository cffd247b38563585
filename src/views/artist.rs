use crate::{
    api::{ApiClient, ApiError},
    types::ArtistDetail,
};

/// An artist's profile, top tracks, related artists and full albums.
///
/// The albums embedded in the artist response are simplified, so they are
/// fetched again through the chunked batch lookup.
pub async fn load(client: &ApiClient, id: &str) -> Result<ArtistDetail, ApiError> {
    let body = client.artist(id).await?;

    let ids: Vec<String> = body
        .albums
        .items
        .iter()
        .map(|a| a.id.clone())
        .filter(|id| !id.is_empty())
        .collect();
    let albums = if ids.is_empty() {
        Vec::new()
    } else {
        client.albums(&ids).await?
    };

    Ok(ArtistDetail {
        artist: body.artist,
        top_tracks: body.top_tracks.tracks,
        related_artists: body.related_artists.artists,
        albums,
    })
}
