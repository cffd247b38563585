use crate::{
    api::{ApiClient, ApiError},
    types::{Album, AlbumRef, Playlist, Track},
    utils::{self, TracksHref},
};

/// An album looked up by id, together with its attributed tracks.
pub async fn album(client: &ApiClient, id: &str) -> Result<(Album, Vec<Track>), ApiError> {
    let album = client
        .several_albums(&[id.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("album {}", id)))?;
    let tracks = album_tracks(client, &album).await?;
    Ok((album, tracks))
}

/// Tracks of an album.
///
/// Uses the tracks embedded in `album` when there are any, otherwise follows
/// its `tracks.href`, otherwise fetches the album by id. Tracks coming back
/// without album information are attributed to `album`.
pub async fn album_tracks(client: &ApiClient, album: &Album) -> Result<Vec<Track>, ApiError> {
    let embedded = album.tracks.as_ref().filter(|t| !t.items.is_empty());

    let mut tracks = match embedded {
        Some(page) => page.items.clone(),
        None => match album.tracks.as_ref().and_then(|t| t.href.as_deref()) {
            Some(href) => by_href(client, href, &album.id).await?,
            None => client.album_tracks(&album.id).await?,
        },
    };

    let album_ref = AlbumRef {
        id: album.id.clone(),
        name: album.name.clone(),
        uri: album.uri.clone(),
        release_date: album.release_date.clone(),
        images: album.images.clone(),
    };
    for track in tracks.iter_mut().filter(|t| t.album.is_none()) {
        track.album = Some(album_ref.clone());
    }
    Ok(tracks)
}

/// Tracks of a playlist, preferring embedded items as [`album_tracks`] does.
pub async fn playlist_tracks(
    client: &ApiClient,
    playlist: &Playlist,
) -> Result<Vec<Track>, ApiError> {
    let embedded: Vec<Track> = playlist
        .tracks
        .as_ref()
        .map(|page| page.items.iter().filter_map(|i| i.track.clone()).collect())
        .unwrap_or_default();
    if !embedded.is_empty() {
        return Ok(embedded);
    }

    match playlist.tracks.as_ref().and_then(|t| t.href.as_deref()) {
        Some(href) => by_href(client, href, &playlist.id).await,
        None => client.playlist_tracks(&playlist.id).await,
    }
}

async fn by_href(client: &ApiClient, href: &str, fallback_id: &str) -> Result<Vec<Track>, ApiError> {
    match utils::parse_tracks_href(href) {
        Some(TracksHref::Album(id)) => client.album_tracks(&id).await,
        Some(TracksHref::Playlist(id)) => client.playlist_tracks(&id).await,
        None => {
            tracing::debug!(href, "unrecognised tracks href, fetching as album");
            client.album_tracks(fallback_id).await
        }
    }
}
