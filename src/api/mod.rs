//! # Remote API Module
//!
//! This module is the HTTP client for the mixtape API server, the backend that
//! holds the user's Spotify session and exposes the catalog endpoints the
//! client browses. Every call goes through [`ApiClient`], which owns the
//! bearer token and the one-shot refresh flow.
//!
//! ## Architecture
//!
//! ```text
//! CLI / Views
//!      ↓
//! ApiClient (bearer auth, refresh on 401)
//!     ├── playlists  (playlists list, playlist detail, playlist tracks)
//!     ├── albums     (album detail, batch album lookup in chunks of 20)
//!     ├── tracks     (top tracks, batch track lookup)
//!     ├── browse     (featured playlists, new releases)
//!     ├── search     (combined search)
//!     ├── artists    (artist detail)
//!     └── auth       (access-token refresh)
//!      ↓
//! reqwest → mixtape API server (JSON)
//! ```
//!
//! ## Error Handling
//!
//! Failures are returned as [`ApiError`] and never retried, with a single
//! exception: a request rejected for a missing or expired token triggers one
//! refresh call, after which the request is issued again. A second rejection
//! is reported as [`ApiError::Unauthorized`].
//!
//! ## Batch Lookups
//!
//! Upstream batch endpoints accept at most [`BATCH_LOOKUP_LIMIT`] ids. Larger
//! id sets go through [`fetch_in_chunks`], which issues the chunk requests
//! concurrently, fails as a whole if any chunk fails, and concatenates the
//! results in the original id order.

mod albums;
mod artists;
mod auth;
mod browse;
mod playlists;
mod search;
mod tracks;

use std::{future::Future, sync::Arc, time::Duration};

use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{management::TokenManager, utils};

pub use utils::BATCH_LOOKUP_LIMIT;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not signed in or session expired, run `mixtape auth`")]
    Unauthorized,

    #[error("token refresh failed: {0}")]
    Refresh(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Client for the mixtape API server.
///
/// Cheap to clone: clones share the HTTP connection pool and the token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<Mutex<TokenManager>>,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url` (e.g.
    /// `https://music.example.com/api`).
    pub fn new(base_url: impl Into<String>, tokens: TokenManager) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues an authenticated GET and decodes the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path relative to the base url, e.g. `/top-tracks`
    /// * `query` - Query parameters appended to the url
    ///
    /// # Token Handling
    ///
    /// - A missing or expired token is refreshed before the request is sent.
    /// - A `401 Unauthorized` response triggers one refresh and one resend.
    /// - Refresh is attempted at most once per call.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] when the request is still rejected after
    ///   a refresh, or no token can be obtained
    /// - [`ApiError::Refresh`] when the refresh itself is rejected
    /// - [`ApiError::Http`] on transport errors, other non-success statuses
    ///   and undecodable bodies
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut refreshed = false;

        loop {
            let token = self.tokens.lock().await.access_token().map(str::to_string);
            let Some(token) = token else {
                if refreshed {
                    return Err(ApiError::Unauthorized);
                }
                self.refresh_access_token().await?;
                refreshed = true;
                continue;
            };

            let response = self
                .http
                .get(&url)
                .query(query)
                .bearer_auth(&token)
                .send()
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                if refreshed {
                    return Err(ApiError::Unauthorized);
                }
                tracing::debug!(path, "request rejected, refreshing access token");
                self.refresh_access_token().await?;
                refreshed = true;
                continue;
            }

            let response = response.error_for_status()?;
            return Ok(response.json::<T>().await?);
        }
    }
}

/// Runs `fetch` once per chunk of at most `chunk_size` ids and concatenates
/// the results in chunk order.
///
/// The chunk requests are independent reads and are awaited together. If any
/// chunk fails the whole call fails and no partial result is returned.
pub async fn fetch_in_chunks<T, E, F, Fut>(
    ids: &[String],
    chunk_size: usize,
    fetch: F,
) -> Result<Vec<T>, E>
where
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let requests = utils::chunk_ids(ids, chunk_size).into_iter().map(&fetch);
    let chunks = try_join_all(requests).await?;
    Ok(chunks.into_iter().flatten().collect())
}
