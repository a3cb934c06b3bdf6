//! Process-wide cache of the last inventory snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;

use stockdesk_catalog::InventorySnapshot;

use crate::store::rows::snapshot_from_rows;
use crate::store::{InventoryStore, StoreError};

/// Last snapshot read from the store, reused until it is older than
/// `max_age` or explicitly invalidated.
///
/// A zero `max_age` disables caching: every read goes to the store.
///
/// Every [`invalidate`](Self::invalidate) bumps a generation counter. A read
/// only lands in the slot if no invalidation happened while it was in flight,
/// so a slow read that started before a write can never replace a snapshot
/// taken after it.
#[derive(Debug)]
pub struct SnapshotCache {
    max_age: Option<chrono::Duration>,
    generation: AtomicU64,
    slot: RwLock<Option<Arc<InventorySnapshot>>>,
}

impl SnapshotCache {
    pub fn new(max_age: Duration) -> Self {
        let max_age = if max_age.is_zero() {
            None
        } else {
            chrono::Duration::from_std(max_age).ok()
        };
        Self {
            max_age,
            generation: AtomicU64::new(0),
            slot: RwLock::new(None),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_age.is_some()
    }

    fn cached(&self) -> Option<Arc<InventorySnapshot>> {
        let max_age = self.max_age?;
        let slot = self.slot.read().ok()?;
        slot.as_ref()
            .filter(|snap| Utc::now() - snap.read_at() < max_age)
            .cloned()
    }

    /// Cached snapshot if still fresh, otherwise a new read.
    pub async fn get_or_load(
        &self,
        store: &dyn InventoryStore,
    ) -> Result<Arc<InventorySnapshot>, StoreError> {
        if let Some(snapshot) = self.cached() {
            tracing::debug!(rows = snapshot.len(), read_at = %snapshot.read_at(), "snapshot cache hit");
            return Ok(snapshot);
        }
        self.load_fresh(store).await
    }

    /// Read from the store unconditionally and replace the cached snapshot,
    /// unless the cache was invalidated while the read was in flight.
    pub async fn load_fresh(
        &self,
        store: &dyn InventoryStore,
    ) -> Result<Arc<InventorySnapshot>, StoreError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let rows = store.read_all().await?;
        let snapshot = Arc::new(snapshot_from_rows(&rows, Utc::now()));
        tracing::debug!(backend = store.backend_name(), rows = snapshot.len(), "snapshot loaded");

        if self.max_age.is_some() {
            if let Ok(mut slot) = self.slot.write() {
                // checked under the write lock; invalidate() bumps it under the same lock
                if self.generation.load(Ordering::SeqCst) == generation {
                    *slot = Some(Arc::clone(&snapshot));
                } else {
                    tracing::debug!(rows = snapshot.len(), "snapshot outdated by a write, not cached");
                }
            }
        }
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next read goes to the store and reads
    /// already in flight will not be cached.
    pub fn invalidate(&self) {
        let slot = self.slot.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = slot {
            *slot = None;
        }
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
