use chrono::NaiveDate;

use crate::types::{
    Album, AlbumTableRow, Artist, ArtistRef, ArtistTableRow, Image, Playlist, PlaylistTableRow,
    Track, TrackTableRow,
};

/// Maximum number of ids the upstream batch lookups accept per request.
pub const BATCH_LOOKUP_LIMIT: usize = 20;

/// Where a `tracks.href` of an album or playlist points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracksHref {
    Album(String),
    Playlist(String),
}

/// Splits `ids` into consecutive chunks of at most `size` ids, keeping order.
pub fn chunk_ids(ids: &[String], size: usize) -> Vec<Vec<String>> {
    ids.chunks(size.max(1)).map(|chunk| chunk.to_vec()).collect()
}

/// Formats a `YYYY-MM-DD` release date as e.g. `December 8, 2023`.
///
/// Dates with year or month precision are returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Inserts thousands separators, e.g. `1234567` becomes `1,234,567`.
pub fn format_large_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First image with a usable URL. Upstream sometimes sends empty image lists
/// or images without a URL, both are treated as "no image".
pub fn first_image_url(images: &[Image]) -> Option<&str> {
    images
        .iter()
        .map(|i| i.url.as_str())
        .find(|url| !url.is_empty())
}

pub fn artist_names(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extracts the album or playlist id from a `.../albums/{id}/tracks` or
/// `.../playlists/{id}/tracks` href.
pub fn parse_tracks_href(href: &str) -> Option<TracksHref> {
    let path = href.split('?').next().unwrap_or(href);
    let mut segments = path.trim_end_matches('/').rsplit('/');

    if segments.next()? != "tracks" {
        return None;
    }
    let id = segments.next().filter(|id| !id.is_empty())?;
    match segments.next()? {
        "albums" => Some(TracksHref::Album(id.to_string())),
        "playlists" => Some(TracksHref::Playlist(id.to_string())),
        _ => None,
    }
}

fn preview_marker(preview_url: Option<&str>) -> String {
    match preview_url {
        Some(url) if !url.is_empty() => "♪".to_string(),
        _ => "-".to_string(),
    }
}

pub fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            index: i + 1,
            name: t.name.clone(),
            artists: artist_names(&t.artists),
            album: t.album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            preview: preview_marker(t.preview_url.as_deref()),
        })
        .collect()
}

pub fn album_rows(albums: &[Album]) -> Vec<AlbumTableRow> {
    albums
        .iter()
        .enumerate()
        .map(|(i, a)| AlbumTableRow {
            index: i + 1,
            name: a.name.clone(),
            artists: artist_names(&a.artists),
            released: format_date(&a.release_date),
            preview: preview_marker(album_preview_url(a)),
        })
        .collect()
}

pub fn playlist_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: p.name.clone(),
            description: p.description.clone(),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    artists
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            index: i + 1,
            name: a.name.clone(),
            followers: a
                .followers
                .as_ref()
                .map(|f| format_large_number(f.total))
                .unwrap_or_default(),
            genres: a.genres.join(", "),
        })
        .collect()
}

/// An album previews with its first embedded track.
pub fn album_preview_url(album: &Album) -> Option<&str> {
    album
        .tracks
        .as_ref()
        .and_then(|t| t.items.first())
        .and_then(|t| t.preview_url.as_deref())
}
