mod auth;
mod cache;
mod slots;
mod store;

pub use auth::TokenManager;
pub use cache::CacheEntry;
pub use cache::CacheGateway;
pub use cache::Clock;
pub use cache::ManualClock;
pub use cache::SystemClock;
pub use slots::CacheSlot;
pub use store::CacheStore;
pub use store::FileStore;
pub use store::MemoryStore;
