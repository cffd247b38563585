//! # Views Module
//!
//! One loader per browsable listing. Every loader takes a [`Catalog`], the
//! pair of remote client and local cache that all views share, and returns
//! the data a view renders. List views go through the TTL cache; detail views
//! are always fetched.
//!
//! | Loader                     | Cache slot               | TTL  |
//! |----------------------------|--------------------------|------|
//! | [`discovery::load`]        | `discoverWeeklyCache`    | 1 h  |
//! | [`top_tracks::load`]       | `topTracksCache`         | 1 h  |
//! | [`featured::load`]         | `featuredPlaylistsCache` | 1 h  |
//! | [`new_releases::load`]     | `newReleasesCache`       | 10 h |
//! | [`search::load`]           | `searchResults`          | 1 h  |
//! | [`detail::album_tracks`]   | -                        | -    |
//! | [`detail::playlist_tracks`]| -                        | -    |
//! | [`artist::load`]           | -                        | -    |
//!
//! Detail loads may finish after the user has moved on. A view holds a
//! [`ConsumerSlot`] and only applies a result whose [`Ticket`] is still
//! current.

pub mod artist;
pub mod detail;
pub mod discovery;
pub mod featured;
pub mod new_releases;
pub mod search;
pub mod top_tracks;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{api::ApiClient, management::CacheGateway};

/// Remote client and local cache, shared by every view.
#[derive(Clone)]
pub struct Catalog {
    pub client: ApiClient,
    pub cache: CacheGateway,
}

impl Catalog {
    pub fn new(client: ApiClient, cache: CacheGateway) -> Self {
        Self { client, cache }
    }
}

/// Proof that a load was started by the consumer that is current at the
/// time the ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks which consumer of a piece of data is currently active.
///
/// Each [`ConsumerSlot::mount`] supersedes every ticket issued before it, and
/// [`ConsumerSlot::unmount`] supersedes all of them. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct ConsumerSlot {
    generation: Arc<AtomicU64>,
}

impl ConsumerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Hands `result` back only if `ticket` is still current.
    pub fn accept<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(?ticket, "discarding stale result");
            None
        }
    }
}
