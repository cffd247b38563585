//! mixtape client library
//!
//! A terminal client for the mixtape API: it browses the user's weekly
//! discovery playlist, top tracks, featured playlists, new releases and search
//! results, and plays 30-second previews of what is on screen.
//!
//! # Modules
//!
//! - `api` - HTTP client for the remote API, token transport and refresh
//! - `cli` - Command-line interface implementations and the preview prompt
//! - `config` - Configuration management and environment variables
//! - `management` - Local persistence: token file and the TTL response cache
//! - `preview` - Single-active-preview controller and audio output
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `views` - One loader per browsable listing
//!
//! # Example
//!
//! ```
//! use mixtape::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> mixtape::Res<()> {
//!     config::load_env().await?;
//!     cli::top_tracks(false).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod preview;
pub mod types;
pub mod utils;
pub mod views;

/// A convenient Result type alias for the binary's start-up steps.
///
/// Library seams use typed errors ([`api::ApiError`],
/// [`preview::PlaybackError`]); this alias boxes whatever the caller
/// collects on the way.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Loading top tracks...");
/// info!("{} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits with
/// status 1.
///
/// Reserved for broken local setup. Remote failures are reported with
/// [`warning!`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow exclamation mark. Execution continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
