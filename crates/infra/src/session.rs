//! One inventory-entry interaction: read, generate, append, refresh.
//!
//! A session is created per interaction and owns its snapshot. The store and
//! the snapshot cache are shared across sessions.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use stockdesk_catalog::{
    CategoryPrefixMap, InventorySnapshot, ProductForm, ProductRecord, RecordDate, generate_sku,
};
use stockdesk_core::DomainError;

use crate::snapshot_cache::SnapshotCache;
use crate::store::{InventoryStore, StoreError};

pub const DEFAULT_ADDED_BY: &str = "User";

/// Whether to re-read the store right before appending.
///
/// `Off` counts against the snapshot the interaction started from; two
/// concurrent submits in one category can then produce the same SKU.
/// `Recheck` re-reads, generates from the fresh rows and refuses the append
/// if that SKU is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkuVerification {
    #[default]
    Off,
    Recheck,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub prefixes: CategoryPrefixMap,
    pub added_by: String,
    pub sku_verification: SkuVerification,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prefixes: CategoryPrefixMap::standard(),
            added_by: DEFAULT_ADDED_BY.to_string(),
            sku_verification: SkuVerification::Off,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Reading,
    Ready,
    Submitting,
    StoreUnavailable { message: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    Conflict(String),
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        let msg = err.message().to_string();
        match err {
            DomainError::Validation(_) => Self::Validation(msg),
            DomainError::Conflict(_) => Self::Conflict(msg),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// What the table shows: the (filtered) rows, or nothing plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView {
    pub records: Vec<ProductRecord>,
    pub error: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
}

pub struct InventorySession {
    store: Arc<dyn InventoryStore>,
    cache: Arc<SnapshotCache>,
    config: Arc<SessionConfig>,
    state: SessionState,
    snapshot: Option<Arc<InventorySnapshot>>,
}

impl InventorySession {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        cache: Arc<SnapshotCache>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            store,
            cache,
            config,
            state: SessionState::Idle,
            snapshot: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&InventorySnapshot> {
        self.snapshot.as_deref()
    }

    fn unavailable(&mut self, err: StoreError) -> SessionError {
        let err = SessionError::from(err);
        self.state = SessionState::StoreUnavailable {
            message: err.to_string(),
        };
        self.snapshot = None;
        err
    }

    /// Read the inventory (through the cache).
    pub async fn load(&mut self) -> Result<Arc<InventorySnapshot>, SessionError> {
        self.state = SessionState::Reading;
        match self.cache.get_or_load(self.store.as_ref()).await {
            Ok(snapshot) => {
                self.state = SessionState::Ready;
                self.snapshot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(backend = self.store.backend_name(), error = %err, "inventory read failed");
                Err(self.unavailable(err))
            }
        }
    }

    async fn ensure_loaded(&mut self) -> Result<Arc<InventorySnapshot>, SessionError> {
        if self.state == SessionState::Ready {
            if let Some(snapshot) = &self.snapshot {
                return Ok(Arc::clone(snapshot));
            }
        }
        self.load().await
    }

    /// Base categories followed by any others seen in the inventory.
    pub fn category_choices(&self) -> Vec<String> {
        match &self.snapshot {
            Some(snapshot) => snapshot.category_choices(&self.config.prefixes),
            None => self
                .config
                .prefixes
                .categories()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Validate the form, assign a SKU and append the record.
    ///
    /// Validation failures never touch the store. On success the cache is
    /// invalidated and the inventory re-read; if that re-read fails the
    /// record is still returned (it was written) and the session reports the
    /// store as unavailable.
    pub async fn submit(
        &mut self,
        form: &ProductForm,
        today: NaiveDate,
    ) -> Result<ProductRecord, SessionError> {
        let draft = form.validate()?;
        let snapshot = self.ensure_loaded().await?;

        self.state = SessionState::Submitting;
        let config = Arc::clone(&self.config);
        let prefixes = &config.prefixes;
        let mut sku = generate_sku(snapshot.records(), &draft.category, prefixes);

        if config.sku_verification == SkuVerification::Recheck {
            let current = match self.cache.load_fresh(self.store.as_ref()).await {
                Ok(current) => current,
                Err(err) => {
                    tracing::warn!(error = %err, "inventory re-read before append failed");
                    return Err(self.unavailable(err));
                }
            };
            self.snapshot = Some(Arc::clone(&current));
            sku = generate_sku(current.records(), &draft.category, prefixes);
            if current.contains_sku(&sku) {
                self.state = SessionState::Ready;
                tracing::warn!(%sku, category = %draft.category, "generated SKU already taken");
                return Err(DomainError::conflict(format!(
                    "SKU {sku} is already in the inventory; submit again"
                ))
                .into());
            }
        }

        let record = draft.into_record(sku, config.added_by.clone(), RecordDate::from(today));

        if let Err(err) = self.store.append(record.field_values()).await {
            tracing::warn!(sku = %record.sku, error = %err, "append failed");
            return Err(self.unavailable(err));
        }
        tracing::info!(sku = %record.sku, category = %record.category, "product added");

        self.cache.invalidate();
        match self.cache.load_fresh(self.store.as_ref()).await {
            Ok(refreshed) => {
                self.snapshot = Some(refreshed);
                self.state = SessionState::Ready;
            }
            Err(err) => {
                tracing::warn!(sku = %record.sku, error = %err, "refresh after append failed");
                self.unavailable(err);
            }
        }

        Ok(record)
    }

    /// Rows matching `search` (all rows when blank).
    pub fn view(&self, search: Option<&str>) -> InventoryView {
        match (&self.state, &self.snapshot) {
            (SessionState::StoreUnavailable { message }, _) => InventoryView {
                records: Vec::new(),
                error: Some(message.clone()),
                read_at: None,
            },
            (_, Some(snapshot)) => InventoryView {
                records: snapshot
                    .filter(search.unwrap_or(""))
                    .into_iter()
                    .cloned()
                    .collect(),
                error: None,
                read_at: Some(snapshot.read_at()),
            },
            (_, None) => InventoryView {
                records: Vec::new(),
                error: None,
                read_at: None,
            },
        }
    }
}
