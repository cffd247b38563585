use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use mixtape::{Res, cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store an access token, or open the login page
    Auth(AuthOptions),

    /// Your Discover Weekly playlist
    Discover(ListOptions),

    /// Your most played tracks
    TopTracks(ListOptions),

    /// Editorial playlists
    Featured(ListOptions),

    /// Newly released albums
    NewReleases(ListOptions),

    /// Search tracks, albums, playlists and artists
    Search(SearchOptions),

    /// Tracks of an album
    Album(IdOptions),

    /// Artist profile, top tracks, albums and related artists
    Artist(IdOptions),

    /// Show the state of the local response cache
    Cache,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Access token issued by the API server after login
    #[clap(long)]
    access_token: Option<String>,

    /// Refresh token used to renew the access token
    #[clap(long)]
    refresh_token: Option<String>,

    /// Lifetime of the access token in milliseconds
    #[clap(long)]
    max_age: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    /// Browse the listing and play previews
    #[clap(short, long)]
    interactive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search term, matched as typed
    term: String,

    /// Browse the results and play previews
    #[clap(short, long)]
    interactive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOptions {
    id: String,

    /// Browse the listing and play previews
    #[clap(short, long)]
    interactive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() -> Res<()> {
    let filter = EnvFilter::try_new(config::log_filter())
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    if let Err(e) = init_tracing() {
        eprintln!("diagnostics disabled: {e}");
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.access_token, opt.refresh_token, opt.max_age).await,
        Command::Discover(opt) => cli::discover(opt.interactive).await,
        Command::TopTracks(opt) => cli::top_tracks(opt.interactive).await,
        Command::Featured(opt) => cli::featured(opt.interactive).await,
        Command::NewReleases(opt) => cli::new_releases(opt.interactive).await,
        Command::Search(opt) => cli::search(opt.term, opt.interactive).await,
        Command::Album(opt) => cli::album(opt.id, opt.interactive).await,
        Command::Artist(opt) => cli::artist(opt.id, opt.interactive).await,
        Command::Cache => cli::cache_status().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
