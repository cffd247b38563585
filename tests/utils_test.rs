use mixtape::types::{Album, ArtistRef, Image, Paging, Track};
use mixtape::utils::*;

// Helper function to create a test track
fn create_test_track(id: &str, name: &str, preview_url: Option<&str>) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        preview_url: preview_url.map(str::to_string),
        artists: vec![ArtistRef {
            id: format!("{}_artist_id", id),
            name: format!("{} Artist", name),
            uri: String::new(),
        }],
        ..Default::default()
    }
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("id{i}")).collect()
}

#[test]
fn test_chunk_ids_splits_45_into_20_20_5() {
    let all = ids(45);
    let chunks = chunk_ids(&all, BATCH_LOOKUP_LIMIT);

    let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![20, 20, 5]);

    // Concatenating the chunks gives back the original order
    let flattened: Vec<String> = chunks.into_iter().flatten().collect();
    assert_eq!(flattened, all);
}

#[test]
fn test_chunk_ids_exact_multiple_and_empty() {
    assert_eq!(chunk_ids(&ids(40), 20).len(), 2);
    assert!(chunk_ids(&[], 20).is_empty());
}

#[test]
fn test_format_date() {
    assert_eq!(format_date("2023-12-08"), "December 8, 2023");
    assert_eq!(format_date("2024-01-31"), "January 31, 2024");

    // Year or month precision is shown as sent
    assert_eq!(format_date("2019"), "2019");
    assert_eq!(format_date("2019-05"), "2019-05");
    assert_eq!(format_date(""), "");
}

#[test]
fn test_format_large_number() {
    assert_eq!(format_large_number(0), "0");
    assert_eq!(format_large_number(999), "999");
    assert_eq!(format_large_number(1000), "1,000");
    assert_eq!(format_large_number(1234567), "1,234,567");
}

#[test]
fn test_first_image_url_degrades_to_none() {
    assert_eq!(first_image_url(&[]), None);

    let images = vec![
        Image::default(),
        Image {
            url: "https://img.example.com/cover.jpg".to_string(),
            width: Some(640),
            height: Some(640),
        },
    ];
    assert_eq!(
        first_image_url(&images),
        Some("https://img.example.com/cover.jpg")
    );
}

#[test]
fn test_parse_tracks_href() {
    assert_eq!(
        parse_tracks_href("https://api.spotify.com/v1/albums/4aawyAB9vmqN3uQ7FjRGTy/tracks"),
        Some(TracksHref::Album("4aawyAB9vmqN3uQ7FjRGTy".to_string()))
    );
    assert_eq!(
        parse_tracks_href("https://api.spotify.com/v1/playlists/37i9dQZF1DX/tracks?offset=0&limit=100"),
        Some(TracksHref::Playlist("37i9dQZF1DX".to_string()))
    );
    assert_eq!(parse_tracks_href("https://api.spotify.com/v1/albums/abc"), None);
    assert_eq!(parse_tracks_href("https://api.spotify.com/v1/shows/abc/tracks"), None);
    assert_eq!(parse_tracks_href(""), None);
}

#[test]
fn test_artist_names_skips_empty() {
    let artists = vec![
        ArtistRef {
            name: "Daft Punk".to_string(),
            ..Default::default()
        },
        ArtistRef::default(),
        ArtistRef {
            name: "Pharrell Williams".to_string(),
            ..Default::default()
        },
    ];
    assert_eq!(artist_names(&artists), "Daft Punk, Pharrell Williams");
    assert_eq!(artist_names(&[]), "");
}

#[test]
fn test_album_preview_url_uses_first_track() {
    let mut album = Album {
        id: "a1".to_string(),
        ..Default::default()
    };
    assert_eq!(album_preview_url(&album), None);

    album.tracks = Some(Paging {
        items: vec![
            create_test_track("t1", "One", Some("https://p.example.com/1.mp3")),
            create_test_track("t2", "Two", Some("https://p.example.com/2.mp3")),
        ],
        ..Default::default()
    });
    assert_eq!(album_preview_url(&album), Some("https://p.example.com/1.mp3"));
}

#[test]
fn test_track_rows() {
    let tracks = vec![
        create_test_track("t1", "One", Some("https://p.example.com/1.mp3")),
        create_test_track("t2", "Two", None),
    ];
    let rows = track_rows(&tracks);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].index, 1);
    assert_eq!(rows[0].artists, "One Artist");
    assert_eq!(rows[0].preview, "♪");
    assert_eq!(rows[1].index, 2);
    assert_eq!(rows[1].album, "");
    assert_eq!(rows[1].preview, "-");
}
