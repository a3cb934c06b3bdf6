use std::sync::RwLock;

use async_trait::async_trait;

use stockdesk_catalog::ProductRecord;

use super::rows::row_from_values;
use super::{InventoryStore, StoreError, StoreRow};

/// In-memory ordered table.
///
/// Intended for tests/dev. Rows are kept in append order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<Vec<StoreRow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with existing records.
    pub fn with_records(records: impl IntoIterator<Item = ProductRecord>) -> Result<Self, StoreError> {
        let rows = records
            .into_iter()
            .map(|r| row_from_values(r.field_values()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rows: RwLock::new(rows),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn read_all(&self) -> Result<Vec<StoreRow>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        Ok(rows.clone())
    }

    async fn append(&self, values: Vec<String>) -> Result<(), StoreError> {
        let row = row_from_values(values)?;
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        rows.push(row);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
