use std::io::Write;

use tabled::{Table, Tabled};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    api::{ApiClient, ApiError},
    info,
    preview::{AudioBackend, CpalBackend, PreviewController, PreviewItem, ViewId},
    success,
    types::{Album, Artist, ArtistDetail, Playlist, SearchResults, Track},
    utils,
    views::{self, Catalog, ConsumerSlot, Ticket},
    warning,
};

/// One selectable row of an interactive listing.
#[derive(Debug, Clone)]
pub enum Entry {
    Track(Track),
    Album(Album),
    Playlist(Playlist),
    Artist(Artist),
}

impl Entry {
    /// Tracks, albums, playlists, then artists.
    pub fn from_search(results: SearchResults) -> Vec<Entry> {
        let SearchResults {
            tracks,
            albums,
            playlists,
            artists,
        } = results;

        tracks
            .into_iter()
            .map(Entry::Track)
            .chain(albums.into_iter().map(Entry::Album))
            .chain(playlists.into_iter().map(Entry::Playlist))
            .chain(artists.into_iter().map(Entry::Artist))
            .collect()
    }

    /// Top tracks, albums, then related artists.
    pub fn from_artist(detail: ArtistDetail) -> Vec<Entry> {
        detail
            .top_tracks
            .into_iter()
            .map(Entry::Track)
            .chain(detail.albums.into_iter().map(Entry::Album))
            .chain(detail.related_artists.into_iter().map(Entry::Artist))
            .collect()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Track(_) => "track",
            Entry::Album(_) => "album",
            Entry::Playlist(_) => "playlist",
            Entry::Artist(_) => "artist",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Track(t) => &t.name,
            Entry::Album(a) => &a.name,
            Entry::Playlist(p) => &p.name,
            Entry::Artist(a) => &a.name,
        }
    }

    pub fn preview_item(&self) -> PreviewItem {
        match self {
            Entry::Track(t) => t.into(),
            Entry::Album(a) => a.into(),
            Entry::Playlist(p) => p.into(),
            Entry::Artist(a) => a.into(),
        }
    }

    /// Link to the item on the streaming service, if the API sent one.
    pub fn link(&self) -> Option<&str> {
        let urls = match self {
            Entry::Track(t) => &t.external_urls,
            Entry::Album(a) => &a.external_urls,
            Entry::Playlist(p) => &p.external_urls,
            Entry::Artist(a) => &a.external_urls,
        };
        urls.spotify.as_deref().filter(|u| !u.is_empty())
    }

    fn byline(&self) -> String {
        match self {
            Entry::Track(t) => utils::artist_names(&t.artists),
            Entry::Album(a) => utils::artist_names(&a.artists),
            Entry::Playlist(p) => p.description.clone(),
            Entry::Artist(a) => a.genres.join(", "),
        }
    }
}

/// A command typed at the interactive prompt. Indexes are 1-based, as shown
/// in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCommand {
    Hover(usize),
    Leave,
    Pin(usize),
    Stop,
    Detail(usize),
    Open(usize),
    List,
    Back,
    Help,
    Quit,
}

impl PromptCommand {
    pub fn parse(line: &str) -> Option<PromptCommand> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?;
        let index = parts.next().and_then(|n| n.parse::<usize>().ok());
        if parts.next().is_some() {
            return None;
        }

        let command = match (verb, index) {
            ("h" | "hover", Some(n)) => PromptCommand::Hover(n),
            ("p" | "pin", Some(n)) => PromptCommand::Pin(n),
            ("d" | "detail", Some(n)) => PromptCommand::Detail(n),
            ("o" | "open", Some(n)) => PromptCommand::Open(n),
            ("l" | "leave", None) => PromptCommand::Leave,
            ("s" | "stop", None) => PromptCommand::Stop,
            ("ls" | "list", None) => PromptCommand::List,
            ("b" | "back", None) => PromptCommand::Back,
            ("?" | "help", None) => PromptCommand::Help,
            ("q" | "quit" | "exit", None) => PromptCommand::Quit,
            _ => return None,
        };
        match command {
            PromptCommand::Hover(0)
            | PromptCommand::Pin(0)
            | PromptCommand::Detail(0)
            | PromptCommand::Open(0) => None,
            command => Some(command),
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    kind: &'static str,
    name: String,
    by: String,
    preview: &'static str,
}

/// One listing on the navigation stack. Each frame is its own view and owns
/// the previews started from it.
struct Frame {
    title: String,
    view: ViewId,
    entries: Vec<Entry>,
}

impl Frame {
    fn new(title: String, entries: Vec<Entry>) -> Self {
        Self {
            title,
            view: ViewId::next(),
            entries,
        }
    }

    fn entry(&self, n: usize) -> Option<&Entry> {
        n.checked_sub(1).and_then(|i| self.entries.get(i))
    }
}

type DetailResult = (Ticket, String, Result<Vec<Entry>, ApiError>);

fn render<B: AudioBackend>(frame: &Frame, previews: &PreviewController<B>) {
    let pinned = previews.pinned_by(frame.view);
    let hovered = previews.active().map(|s| s.item_id.as_str());

    let rows: Vec<EntryRow> = frame
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let item = entry.preview_item();
            let preview = if pinned == Some(item.id.as_str()) {
                "⟳"
            } else if hovered == Some(item.id.as_str()) {
                "▶"
            } else if item.is_previewable() {
                "♪"
            } else {
                "-"
            };
            EntryRow {
                index: i + 1,
                kind: entry.kind(),
                name: entry.name().to_string(),
                by: entry.byline(),
                preview,
            }
        })
        .collect();

    info!("{}", frame.title);
    println!("{}", Table::new(rows));
}

fn help() {
    info!("h N  preview entry N       l    stop hovering");
    info!("p N  pin/unpin entry N     s    stop any preview");
    info!("d N  open details of N     o N  open N in the browser");
    info!("ls   list again            b    back");
    info!("?    this help             q    quit");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn load_detail(client: &ApiClient, entry: &Entry) -> Result<Vec<Entry>, ApiError> {
    match entry {
        Entry::Track(track) => {
            let artist = track
                .artists
                .first()
                .filter(|a| !a.id.is_empty())
                .ok_or_else(|| ApiError::NotFound(format!("artist of {}", track.name)))?;
            let detail = views::artist::load(client, &artist.id).await?;
            Ok(Entry::from_artist(detail))
        }
        Entry::Album(album) => {
            let tracks = views::detail::album_tracks(client, album).await?;
            Ok(tracks.into_iter().map(Entry::Track).collect())
        }
        Entry::Playlist(playlist) => {
            let tracks = views::detail::playlist_tracks(client, playlist).await?;
            Ok(tracks.into_iter().map(Entry::Track).collect())
        }
        Entry::Artist(artist) => {
            let detail = views::artist::load(client, &artist.id).await?;
            Ok(Entry::from_artist(detail))
        }
    }
}

fn detail_title(entry: &Entry) -> String {
    match entry {
        Entry::Track(t) => t
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| t.name.clone()),
        other => other.name().to_string(),
    }
}

/// Interactive prompt over `entries`.
///
/// Detail listings load in the background; while one is loading the prompt
/// stays responsive and a result that arrives after the user went back or
/// asked for another detail is dropped.
pub async fn browse(catalog: Catalog, title: String, entries: Vec<Entry>) {
    let mut previews = PreviewController::new(CpalBackend::open());
    if !previews.backend().has_output() {
        warning!("No audio output available, previews will be silent.");
    }

    let details = ConsumerSlot::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<DetailResult>();

    let mut stack = vec![Frame::new(title, entries)];
    help();
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warning!("Cannot read input. Err: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    prompt();
                    continue;
                }

                let Some(command) = PromptCommand::parse(&line) else {
                    warning!("Unknown command, type ? for help.");
                    prompt();
                    continue;
                };
                let Some(frame) = stack.last() else { break };

                match command {
                    PromptCommand::Hover(n) => match frame.entry(n) {
                        Some(entry) => {
                            let item = entry.preview_item();
                            if !item.is_previewable() {
                                info!("No preview for {}", item.title);
                            }
                            previews.hover(frame.view, &item).await;
                        }
                        None => warning!("No entry {}", n),
                    },
                    PromptCommand::Leave => {
                        let hovered = previews.active().map(|s| s.item_id.clone());
                        if let Some(id) = hovered {
                            previews.leave(&id);
                        }
                    }
                    PromptCommand::Pin(n) => match frame.entry(n) {
                        Some(entry) => {
                            let item = entry.preview_item();
                            if !item.is_previewable() {
                                info!("No preview for {}", item.title);
                            }
                            if previews.toggle_pin(frame.view, &item).await {
                                success!("Looping {}", item.title);
                            }
                        }
                        None => warning!("No entry {}", n),
                    },
                    PromptCommand::Stop => previews.stop(),
                    PromptCommand::Detail(n) => match frame.entry(n) {
                        Some(entry) => {
                            let ticket = details.mount();
                            let client = catalog.client.clone();
                            let entry = entry.clone();
                            let tx = tx.clone();
                            info!("Loading {}...", entry.name());
                            tokio::spawn(async move {
                                let result = load_detail(&client, &entry).await;
                                let _ = tx.send((ticket, detail_title(&entry), result));
                            });
                        }
                        None => warning!("No entry {}", n),
                    },
                    PromptCommand::Open(n) => match frame.entry(n).and_then(Entry::link) {
                        Some(url) => {
                            if let Err(e) = webbrowser::open(url) {
                                warning!("Cannot open browser. Err: {}", e);
                            }
                        }
                        None => warning!("No link for entry {}", n),
                    },
                    PromptCommand::List => render(frame, &previews),
                    PromptCommand::Back => {
                        if stack.len() == 1 {
                            info!("Already at the top, q quits.");
                        } else if let Some(frame) = stack.pop() {
                            details.unmount();
                            previews.release(frame.view);
                            if let Some(parent) = stack.last() {
                                render(parent, &previews);
                            }
                        }
                    }
                    PromptCommand::Help => help(),
                    PromptCommand::Quit => break,
                }
                prompt();
            }
            Some((ticket, title, result)) = rx.recv() => {
                let Some(result) = details.accept(ticket, result) else {
                    continue;
                };
                match result {
                    Ok(entries) if entries.is_empty() => info!("{} has nothing to list.", title),
                    Ok(entries) => {
                        let frame = Frame::new(title, entries);
                        render(&frame, &previews);
                        stack.push(frame);
                    }
                    Err(e) => warning!("Failed to load {}. Err: {}", title, e),
                }
                prompt();
            }
        }
    }

    details.unmount();
    previews.stop();
}
