//! # CLI Module
//!
//! The user-facing layer of mixtape. Every subcommand loads one view through
//! [`crate::views`], renders it as a table, and optionally hands it to the
//! interactive preview prompt.
//!
//! ## Commands
//!
//! - [`auth`] - stores an access token, or opens the login page
//! - [`discover`], [`top_tracks`], [`featured`], [`new_releases`] - cached
//!   list views
//! - [`search`] - combined search, cached per term
//! - [`album`], [`artist`] - detail views, always fetched
//! - [`cache_status`] - age and freshness of every cache slot
//!
//! ## Interactive Prompt
//!
//! List commands run with `--interactive` drop into [`browse`], where entries
//! can be hovered, pinned and opened. All previews go through a single
//! [`crate::preview::PreviewController`], so only one preview is ever audible
//! no matter how deep the user navigates.
//!
//! ## Error Handling
//!
//! Load failures are reported with [`warning!`](crate::warning) and the
//! command returns normally; a failed view is an empty view, never a crash.
//! Only broken local setup (unwritable token file) aborts with
//! [`error!`](crate::error).

mod auth;
mod browse;
mod cache;
mod lists;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    api::ApiClient,
    config,
    management::{CacheGateway, FileStore, TokenManager},
    views::Catalog,
};

pub use auth::auth;
pub use browse::{Entry, PromptCommand, browse};
pub use cache::cache_status;
pub use lists::album;
pub use lists::artist;
pub use lists::discover;
pub use lists::featured;
pub use lists::new_releases;
pub use lists::search;
pub use lists::top_tracks;

/// Client and cache as configured in the environment.
///
/// A missing token file is not an error here: the first request will try to
/// refresh and report [`crate::api::ApiError::Unauthorized`] if that fails.
pub async fn catalog() -> Catalog {
    let tokens = match TokenManager::load().await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!(error = %e, "no stored token");
            TokenManager::at(config::token_path(), None)
        }
    };

    let client = ApiClient::new(config::api_url(), tokens);
    let cache = CacheGateway::new(Arc::new(FileStore::default_location()));
    Catalog::new(client, cache)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
