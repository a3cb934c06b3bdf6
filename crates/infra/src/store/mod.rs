//! Store collaborator boundary.
//!
//! The inventory lives in an external table. The application needs exactly
//! two operations from it: read every row, and append one row at the end.
//! Backends decide how (in memory, a Google Sheet, ...).

pub mod error;
pub mod in_memory;
pub mod rows;
pub mod sheets;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use error::StoreError;
pub use in_memory::InMemoryStore;
pub use sheets::SheetsStore;

/// One row as a header → cell mapping.
pub type StoreRow = BTreeMap<String, String>;

/// External tabular store.
///
/// `read_all` returns rows in store order. `append` adds one row after the
/// last one, with values in [`stockdesk_catalog::COLUMNS`] order; from the
/// caller's point of view it either fully happens or fails.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn read_all(&self) -> Result<Vec<StoreRow>, StoreError>;

    async fn append(&self, values: Vec<String>) -> Result<(), StoreError>;

    /// Connectivity check: reads everything and reports the row count.
    async fn probe(&self) -> Result<usize, StoreError> {
        Ok(self.read_all().await?.len())
    }

    /// Short backend label for logs and diagnostics.
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn read_all(&self) -> Result<Vec<StoreRow>, StoreError> {
        (**self).read_all().await
    }

    async fn append(&self, values: Vec<String>) -> Result<(), StoreError> {
        (**self).append(values).await
    }

    async fn probe(&self) -> Result<usize, StoreError> {
        (**self).probe().await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
