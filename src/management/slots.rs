use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Named cache slots, one per data category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSlot {
    WeeklyDiscovery,
    FeaturedPlaylists,
    TopTracks,
    NewReleases,
    SearchResults,
}

impl CacheSlot {
    pub const ALL: [CacheSlot; 5] = [
        CacheSlot::WeeklyDiscovery,
        CacheSlot::FeaturedPlaylists,
        CacheSlot::TopTracks,
        CacheSlot::NewReleases,
        CacheSlot::SearchResults,
    ];

    /// Storage key of the slot.
    pub fn key(self) -> &'static str {
        match self {
            CacheSlot::WeeklyDiscovery => "discoverWeeklyCache",
            CacheSlot::FeaturedPlaylists => "featuredPlaylistsCache",
            CacheSlot::TopTracks => "topTracksCache",
            CacheSlot::NewReleases => "newReleasesCache",
            CacheSlot::SearchResults => "searchResults",
        }
    }

    pub fn ttl(self) -> Duration {
        match self {
            CacheSlot::NewReleases => 10 * HOUR,
            _ => HOUR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CacheSlot::WeeklyDiscovery => "Discover Weekly",
            CacheSlot::FeaturedPlaylists => "Featured Playlists",
            CacheSlot::TopTracks => "Top Tracks",
            CacheSlot::NewReleases => "New Releases",
            CacheSlot::SearchResults => "Search",
        }
    }
}
