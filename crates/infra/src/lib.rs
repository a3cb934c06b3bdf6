//! Infrastructure layer: store backends, snapshot caching, the inventory
//! session and configuration.

pub mod config;
pub mod session;
pub mod snapshot_cache;
pub mod store;

pub use config::{AppConfig, LogFormat, SheetsConfig, StoreBackend};
pub use session::{
    InventorySession, InventoryView, SessionConfig, SessionError, SessionState, SkuVerification,
};
pub use snapshot_cache::SnapshotCache;
pub use store::{InMemoryStore, InventoryStore, SheetsStore, StoreError, StoreRow};
