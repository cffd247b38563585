use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use mixtape::management::{
    CacheEntry, CacheGateway, CacheSlot, FileStore, ManualClock, MemoryStore,
};
use serde_json::{Value, json};

const START: i64 = 1_700_000_000_000;

fn gateway() -> (CacheGateway, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let cache = CacheGateway::with_clock(store.clone(), clock.clone());
    (cache, store, clock)
}

async fn counted_fetch(
    cache: &CacheGateway,
    slot: CacheSlot,
    calls: &AtomicUsize,
    payload: Value,
) -> Result<Value, String> {
    cache
        .fetch_with_cache(slot.key(), slot.ttl(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(payload)
        })
        .await
}

#[test]
fn test_slot_keys_and_ttls() {
    assert_eq!(CacheSlot::WeeklyDiscovery.key(), "discoverWeeklyCache");
    assert_eq!(CacheSlot::FeaturedPlaylists.key(), "featuredPlaylistsCache");
    assert_eq!(CacheSlot::TopTracks.key(), "topTracksCache");
    assert_eq!(CacheSlot::NewReleases.key(), "newReleasesCache");
    assert_eq!(CacheSlot::SearchResults.key(), "searchResults");

    assert_eq!(CacheSlot::NewReleases.ttl(), Duration::from_secs(10 * 3600));
    for slot in CacheSlot::ALL {
        if slot != CacheSlot::NewReleases {
            assert_eq!(slot.ttl(), Duration::from_secs(3600));
        }
    }
}

#[tokio::test]
async fn test_hit_within_ttl_skips_fetch_for_every_slot() {
    for slot in CacheSlot::ALL {
        let (cache, store, clock) = gateway();
        let calls = AtomicUsize::new(0);

        let first = counted_fetch(&cache, slot, &calls, json!({"n": 1})).await;
        assert_eq!(first, Ok(json!({"n": 1})));
        assert_eq!(store.writes(), 1);

        clock.advance(slot.ttl() - Duration::from_millis(1));
        let second = counted_fetch(&cache, slot, &calls, json!({"n": 2})).await;

        assert_eq!(second, Ok(json!({"n": 1})), "slot {:?}", slot);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No write on a hit
        assert_eq!(store.writes(), 1);
    }
}

#[tokio::test]
async fn test_expired_entry_fetches_once_and_overwrites() {
    let slot = CacheSlot::TopTracks;
    let (cache, store, clock) = gateway();
    let calls = AtomicUsize::new(0);

    counted_fetch(&cache, slot, &calls, json!(["old"]))
        .await
        .unwrap();
    clock.advance(slot.ttl());

    let refreshed = counted_fetch(&cache, slot, &calls, json!(["new"])).await;
    assert_eq!(refreshed, Ok(json!(["new"])));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.writes(), 2);

    let stored: CacheEntry<Value> =
        serde_json::from_str(&store.get(slot.key()).unwrap()).unwrap();
    assert_eq!(stored.payload, json!(["new"]));
    assert_eq!(
        stored.stored_at,
        START + slot.ttl().as_millis() as i64
    );
}

#[tokio::test]
async fn test_stored_entry_shape() {
    let (cache, store, _) = gateway();
    let calls = AtomicUsize::new(0);
    counted_fetch(&cache, CacheSlot::FeaturedPlaylists, &calls, json!([1, 2]))
        .await
        .unwrap();

    let raw: Value = serde_json::from_str(&store.get("featuredPlaylistsCache").unwrap()).unwrap();
    assert_eq!(raw, json!({"data": [1, 2], "timestamp": START}));
}

#[tokio::test]
async fn test_malformed_entry_is_a_miss() {
    let slot = CacheSlot::NewReleases;
    let (cache, store, _) = gateway();
    store.insert(slot.key(), "{not json");
    let calls = AtomicUsize::new(0);

    let result = counted_fetch(&cache, slot, &calls, json!("fresh")).await;

    assert_eq!(result, Ok(json!("fresh")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_entry_untouched() {
    let slot = CacheSlot::WeeklyDiscovery;
    let (cache, store, clock) = gateway();
    let calls = AtomicUsize::new(0);
    counted_fetch(&cache, slot, &calls, json!("kept"))
        .await
        .unwrap();
    let before = store.get(slot.key());

    clock.advance(slot.ttl() * 2);
    let result: Result<Value, String> = cache
        .fetch_with_cache(slot.key(), slot.ttl(), || async {
            Err("upstream down".to_string())
        })
        .await;

    assert_eq!(result, Err("upstream down".to_string()));
    assert_eq!(store.writes(), 1);
    assert_eq!(store.get(slot.key()), before);
}

#[tokio::test]
async fn test_validity_check_rejects_fresh_entry() {
    let slot = CacheSlot::SearchResults;
    let (cache, store, _) = gateway();

    let first: Result<Value, String> = cache
        .fetch_with_cache_if(
            slot.key(),
            slot.ttl(),
            || async { Ok(json!({"searchTerm": "daft punk"})) },
            |v: &Value| v["searchTerm"] == "daft punk",
        )
        .await;
    assert!(first.is_ok());

    let calls = AtomicUsize::new(0);
    let second: Result<Value, String> = cache
        .fetch_with_cache_if(
            slot.key(),
            slot.ttl(),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"searchTerm": "Daft Punk"}))
            },
            |v: &Value| v["searchTerm"] == "Daft Punk",
        )
        .await;

    assert_eq!(second, Ok(json!({"searchTerm": "Daft Punk"})));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes(), 2);
}

#[tokio::test]
async fn test_entry_age() {
    let (cache, _, clock) = gateway();
    assert_eq!(cache.entry_age("topTracksCache").await, None);

    let calls = AtomicUsize::new(0);
    counted_fetch(&cache, CacheSlot::TopTracks, &calls, json!([]))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(90));

    assert_eq!(
        cache.entry_age("topTracksCache").await,
        Some(Duration::from_secs(90))
    );
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("cache");
    let cache = CacheGateway::with_clock(
        Arc::new(FileStore::new(root.clone())),
        Arc::new(ManualClock::new(START)),
    );
    let calls = AtomicUsize::new(0);

    counted_fetch(&cache, CacheSlot::TopTracks, &calls, json!(["a"]))
        .await
        .unwrap();
    let again = counted_fetch(&cache, CacheSlot::TopTracks, &calls, json!(["b"])).await;

    assert_eq!(again, Ok(json!(["a"])));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(root.join("topTracksCache.json").is_file());
}

#[tokio::test]
async fn test_entry_from_the_future_is_stale() {
    let slot = CacheSlot::TopTracks;
    let (cache, store, clock) = gateway();
    let calls = AtomicUsize::new(0);
    counted_fetch(&cache, slot, &calls, json!(["ahead"]))
        .await
        .unwrap();

    // Wall clock stepped back by a minute
    clock.set(START - 60_000);
    let result = counted_fetch(&cache, slot, &calls, json!(["now"])).await;

    assert_eq!(result, Ok(json!(["now"])));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.writes(), 2);
}

#[test]
fn test_is_fresh_bounds() {
    let entry = CacheEntry {
        payload: (),
        stored_at: START,
    };
    let ttl = Duration::from_secs(3600);

    assert!(entry.is_fresh(START, ttl));
    assert!(entry.is_fresh(START + 3_599_999, ttl));
    assert!(!entry.is_fresh(START + 3_600_000, ttl));
    assert!(!entry.is_fresh(START - 1, ttl));
}
