// Service exports
pub mod cache;
pub mod firebase;
pub mod store;

pub use cache::{CacheKey, CacheStats, SnapshotCache, UserSnapshot};
pub use firebase::FirebaseClient;
pub use store::{InMemoryUserStore, StoreError, UserStore};
