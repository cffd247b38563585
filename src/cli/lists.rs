use tabled::Table;

use crate::{
    info,
    types::{Album, Playlist, Track},
    utils,
    views::{self, Catalog},
    warning,
};

use super::{Entry, browse, catalog, spinner};

fn print_tracks(tracks: &[Track]) {
    println!("{}", Table::new(utils::track_rows(tracks)));
}

fn print_albums(albums: &[Album]) {
    println!("{}", Table::new(utils::album_rows(albums)));
}

fn print_playlists(playlists: &[Playlist]) {
    println!("{}", Table::new(utils::playlist_rows(playlists)));
}

async fn finish(catalog: Catalog, interactive: bool, title: String, entries: Vec<Entry>) {
    if interactive {
        browse(catalog, title, entries).await;
    }
}

pub async fn discover(interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading Discover Weekly...");
    let result = views::discovery::load(&catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(weekly) => {
            info!("{} ({} tracks)", weekly.info.name, weekly.tracks.len());
            if !weekly.info.description.is_empty() {
                info!("{}", weekly.info.description);
            }
            print_tracks(&weekly.tracks);
            let entries = weekly.tracks.into_iter().map(Entry::Track).collect();
            finish(catalog, interactive, weekly.info.name, entries).await;
        }
        Err(e) => warning!("Failed to load Discover Weekly. Err: {}", e),
    }
}

pub async fn top_tracks(interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading top tracks...");
    let result = views::top_tracks::load(&catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) => {
            print_tracks(&tracks);
            let entries = tracks.into_iter().map(Entry::Track).collect();
            finish(catalog, interactive, "Top Tracks".to_string(), entries).await;
        }
        Err(e) => warning!("Failed to load top tracks. Err: {}", e),
    }
}

pub async fn featured(interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading featured playlists...");
    let result = views::featured::load(&catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(playlists) => {
            print_playlists(&playlists);
            let entries = playlists.into_iter().map(Entry::Playlist).collect();
            finish(catalog, interactive, "Featured Playlists".to_string(), entries).await;
        }
        Err(e) => warning!("Failed to load featured playlists. Err: {}", e),
    }
}

pub async fn new_releases(interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading new releases...");
    let result = views::new_releases::load(&catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) => {
            print_albums(&albums);
            let entries = albums.into_iter().map(Entry::Album).collect();
            finish(catalog, interactive, "New Releases".to_string(), entries).await;
        }
        Err(e) => warning!("Failed to load new releases. Err: {}", e),
    }
}

pub async fn search(term: String, interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner(&format!("Searching for \"{}\"...", term));
    let result = views::search::load(&catalog, &term).await;
    pb.finish_and_clear();

    let results = match result {
        Ok(Some(results)) => results,
        Ok(None) => {
            info!("Type something to search for.");
            return;
        }
        Err(e) => {
            warning!("Search failed. Err: {}", e);
            return;
        }
    };

    if !results.tracks.is_empty() {
        info!("Tracks");
        print_tracks(&results.tracks);
    }
    if !results.albums.is_empty() {
        info!("Albums");
        print_albums(&results.albums);
    }
    if !results.playlists.is_empty() {
        info!("Playlists");
        print_playlists(&results.playlists);
    }
    if !results.artists.is_empty() {
        info!("Artists");
        println!("{}", Table::new(utils::artist_rows(&results.artists)));
    }

    let entries = Entry::from_search(results);
    if entries.is_empty() {
        info!("Nothing found for \"{}\".", term);
        return;
    }
    finish(catalog, interactive, format!("Search: {}", term), entries).await;
}

pub async fn album(id: String, interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading album...");
    let result = views::detail::album(&catalog.client, &id).await;
    pb.finish_and_clear();

    match result {
        Ok((album, tracks)) => {
            print_tracks(&tracks);
            let entries = tracks.into_iter().map(Entry::Track).collect();
            finish(catalog, interactive, format!("Album: {}", album.name), entries).await;
        }
        Err(e) => warning!("Failed to load album {}. Err: {}", id, e),
    }
}

pub async fn artist(id: String, interactive: bool) {
    let catalog = catalog().await;
    let pb = spinner("Loading artist...");
    let result = views::artist::load(&catalog.client, &id).await;
    pb.finish_and_clear();

    let detail = match result {
        Ok(detail) => detail,
        Err(e) => {
            warning!("Failed to load artist {}. Err: {}", id, e);
            return;
        }
    };

    let artist = &detail.artist;
    info!("{}", artist.name);
    if let Some(followers) = &artist.followers {
        info!("{} followers", utils::format_large_number(followers.total));
    }
    if !artist.genres.is_empty() {
        info!("{}", artist.genres.join(", "));
    }
    if let Some(url) = utils::first_image_url(&artist.images) {
        info!("{}", url);
    }

    info!("Top tracks");
    print_tracks(&detail.top_tracks);
    if !detail.albums.is_empty() {
        info!("Albums");
        print_albums(&detail.albums);
    }
    if !detail.related_artists.is_empty() {
        info!("Related artists");
        println!("{}", Table::new(utils::artist_rows(&detail.related_artists)));
    }

    let title = detail.artist.name.clone();
    finish(catalog, interactive, title, Entry::from_artist(detail)).await;
}
