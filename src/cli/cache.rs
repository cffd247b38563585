use std::{sync::Arc, time::Duration};

use tabled::{Table, Tabled};

use crate::{
    info,
    management::{CacheGateway, CacheSlot, FileStore},
};

#[derive(Tabled)]
struct CacheSlotRow {
    slot: String,
    key: String,
    ttl: String,
    age: String,
    state: String,
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Prints every cache slot with the age of its entry and whether a view
/// would be served from it.
pub async fn cache_status() {
    let store = FileStore::default_location();
    let root = store.root().clone();
    let cache = CacheGateway::new(Arc::new(store));

    let mut rows = Vec::with_capacity(CacheSlot::ALL.len());
    for slot in CacheSlot::ALL {
        let age = cache.entry_age(slot.key()).await;
        let state = match age {
            None => "empty",
            Some(age) if age < slot.ttl() => "fresh",
            Some(_) => "expired",
        };
        rows.push(CacheSlotRow {
            slot: slot.label().to_string(),
            key: slot.key().to_string(),
            ttl: format_duration(slot.ttl()),
            age: age.map(format_duration).unwrap_or_else(|| "-".to_string()),
            state: state.to_string(),
        });
    }

    info!("Cache directory: {}", root.display());
    println!("{}", Table::new(rows));
}
