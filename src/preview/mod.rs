//! # Preview Module
//!
//! Thirty-second track previews. The module is split into the playback seam
//! and the policy that sits on top of it:
//!
//! - [`AudioSource`] / [`AudioBackend`] - a loaded preview that can be
//!   played, paused, looped and repositioned, and the factory producing it
//!   from a preview URL. [`CpalBackend`] is the real implementation.
//! - [`PreviewController`] - the single owner of "what is audible". Every
//!   view hovers and pins through the same controller, so at most one preview
//!   plays at any time and the previous one is always stopped before the
//!   next one starts.

mod controller;
mod output;

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    types::{Album, Artist, Playlist, Track},
    utils,
};

pub use controller::{PreviewController, PreviewMode, PreviewSession, PreviewState};
pub use output::{CpalBackend, CpalSource};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to fetch preview: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to decode preview: {0}")]
    Decode(String),

    #[error("no audio output device available")]
    NoDevice,

    #[error("audio output failed: {0}")]
    Output(String),
}

/// A loaded preview.
pub trait AudioSource: Send {
    /// Starts or resumes playback from the current position.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn set_looping(&mut self, looping: bool);

    fn set_position(&mut self, position: Duration);

    fn position(&self) -> Duration;

    fn is_playing(&self) -> bool;
}

/// Produces audio sources from preview URLs.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    type Source: AudioSource;

    async fn load(&self, uri: &str) -> Result<Self::Source, PlaybackError>;
}

/// Identifies the view that owns a preview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

impl ViewId {
    /// Allocates an id no other view in this process holds.
    pub fn next() -> Self {
        ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Anything a user can point at or select in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub id: String,
    pub title: String,
    /// Preview URL, `None` when the item has nothing to play.
    pub source: Option<String>,
}

impl PreviewItem {
    pub fn is_previewable(&self) -> bool {
        self.source.as_deref().is_some_and(|s| !s.is_empty())
    }
}

impl From<&Track> for PreviewItem {
    fn from(track: &Track) -> Self {
        let artists = utils::artist_names(&track.artists);
        let title = if artists.is_empty() {
            track.name.clone()
        } else {
            format!("{} - {}", track.name, artists)
        };
        PreviewItem {
            id: track.id.clone(),
            title,
            source: track.preview_url.clone(),
        }
    }
}

impl From<&Album> for PreviewItem {
    fn from(album: &Album) -> Self {
        PreviewItem {
            id: album.id.clone(),
            title: album.name.clone(),
            source: utils::album_preview_url(album).map(str::to_string),
        }
    }
}

impl From<&Playlist> for PreviewItem {
    fn from(playlist: &Playlist) -> Self {
        PreviewItem {
            id: playlist.id.clone(),
            title: playlist.name.clone(),
            source: None,
        }
    }
}

impl From<&Artist> for PreviewItem {
    fn from(artist: &Artist) -> Self {
        PreviewItem {
            id: artist.id.clone(),
            title: artist.name.clone(),
            source: None,
        }
    }
}
