use std::sync::Arc;

use stockdesk_infra::{
    AppConfig, InMemoryStore, InventorySession, InventoryStore, SessionConfig, SnapshotCache,
};

/// Long-lived state shared by every request.
///
/// The store is built once at startup and reused; each request gets its own
/// [`InventorySession`] over it.
pub struct AppServices {
    pub store: Arc<dyn InventoryStore>,
    pub cache: Arc<SnapshotCache>,
    pub session_config: Arc<SessionConfig>,
    pub currency_symbol: String,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        cache: SnapshotCache,
        session_config: SessionConfig,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache: Arc::new(cache),
            session_config: Arc::new(session_config),
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = config.build_store()?;
        tracing::info!(
            backend = store.backend_name(),
            snapshot_ttl_secs = config.snapshot_ttl.as_secs(),
            sku_verification = ?config.sku_verification,
            "inventory services ready"
        );
        Ok(Self::new(
            store,
            SnapshotCache::new(config.snapshot_ttl),
            config.session_config(),
            config.currency_symbol.clone(),
        ))
    }

    /// In-memory store with default settings.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(
            store,
            SnapshotCache::default(),
            SessionConfig::default(),
            stockdesk_infra::config::DEFAULT_CURRENCY,
        )
    }

    pub fn new_session(&self) -> InventorySession {
        InventorySession::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            Arc::clone(&self.session_config),
        )
    }
}
