use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

// Upstream payloads send `null` for absent values as often as they omit the
// key. `#[serde(default)]` only covers the latter.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reads a list, dropping `null` elements.
fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "null_to_default")]
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Followers {
    #[serde(deserialize_with = "null_to_default")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistRef {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_to_default")]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "skip_nulls")]
    pub images: Vec<Image>,
    pub followers: Option<Followers>,
    pub popularity: Option<u32>,
    #[serde(deserialize_with = "null_to_default")]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumRef {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_to_default")]
    pub release_date: String,
    #[serde(deserialize_with = "skip_nulls")]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
    pub preview_url: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub duration_ms: u64,
    pub album: Option<AlbumRef>,
    #[serde(deserialize_with = "skip_nulls")]
    pub artists: Vec<ArtistRef>,
    #[serde(deserialize_with = "null_to_default")]
    pub external_urls: ExternalUrls,
}

/// A page of items as returned by list endpoints. Only `items` is relied on;
/// `href` points at the full listing when the items were not embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paging<T> {
    #[serde(deserialize_with = "skip_nulls")]
    pub items: Vec<T>,
    pub href: Option<String>,
    pub total: Option<u64>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            href: None,
            total: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_to_default")]
    pub album_type: String,
    #[serde(rename = "type", deserialize_with = "null_to_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_to_default")]
    pub release_date: String,
    #[serde(deserialize_with = "skip_nulls")]
    pub images: Vec<Image>,
    #[serde(deserialize_with = "skip_nulls")]
    pub artists: Vec<ArtistRef>,
    pub tracks: Option<Paging<Track>>,
    #[serde(deserialize_with = "null_to_default")]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playlist {
    #[serde(deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "null_to_default")]
    pub kind: String,
    /// Cover URL flattened by the API server on the playlists list endpoint.
    pub image: Option<String>,
    #[serde(deserialize_with = "skip_nulls")]
    pub images: Vec<Image>,
    pub tracks: Option<Paging<PlaylistItem>>,
    #[serde(deserialize_with = "null_to_default")]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Body<T: Default> {
    #[serde(default, deserialize_with = "null_to_default")]
    pub body: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistsResponse {
    #[serde(deserialize_with = "skip_nulls")]
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistDetailResponse {
    #[serde(rename = "playlistTracks", deserialize_with = "skip_nulls")]
    pub playlist_tracks: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistTracksBody {
    #[serde(deserialize_with = "null_to_default")]
    pub tracks: Paging<PlaylistItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeveralAlbumsBody {
    #[serde(deserialize_with = "null_to_default")]
    pub albums: Vec<Option<Album>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeveralTracksBody {
    #[serde(deserialize_with = "null_to_default")]
    pub tracks: Vec<Option<Track>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TopTracksResponse {
    #[serde(rename = "topTracks", deserialize_with = "skip_nulls")]
    pub top_tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeaturedPlaylistsBody {
    #[serde(deserialize_with = "null_to_default")]
    pub playlists: Paging<Playlist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewReleasesResponse {
    #[serde(rename = "newReleases", deserialize_with = "skip_nulls")]
    pub new_releases: Vec<Album>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchAllBody {
    #[serde(deserialize_with = "null_to_default")]
    pub tracks: Paging<Track>,
    #[serde(deserialize_with = "null_to_default")]
    pub albums: Paging<Album>,
    #[serde(deserialize_with = "null_to_default")]
    pub playlists: Paging<Playlist>,
    #[serde(deserialize_with = "null_to_default")]
    pub artists: Paging<Artist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistTopTracks {
    #[serde(deserialize_with = "skip_nulls")]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelatedArtists {
    #[serde(deserialize_with = "skip_nulls")]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistDetailBody {
    #[serde(deserialize_with = "null_to_default")]
    pub artist: Artist,
    #[serde(rename = "topTracks", deserialize_with = "null_to_default")]
    pub top_tracks: ArtistTopTracks,
    #[serde(rename = "relatedArtists", deserialize_with = "null_to_default")]
    pub related_artists: RelatedArtists,
    #[serde(deserialize_with = "null_to_default")]
    pub albums: Paging<Album>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Lifetime of the new token in milliseconds.
    #[serde(rename = "maxAge", default)]
    pub max_age: i64,
}

/// The weekly discovery playlist together with its tracks, as cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyDiscovery {
    pub info: Playlist,
    pub tracks: Vec<Track>,
}

/// Search response after the batch track lookup has been merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
    pub playlists: Vec<Playlist>,
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub top_tracks: Vec<Track>,
    pub related_artists: Vec<Artist>,
    pub albums: Vec<Album>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub preview: String,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub artists: String,
    pub released: String,
    pub preview: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub description: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub followers: String,
    pub genres: String,
}

/// Bearer token as persisted locally. `expires_at` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}
