use chrono::{DateTime, Utc};

use stockdesk_core::Entity;

use crate::category::CategoryPrefixMap;
use crate::record::ProductRecord;
use crate::sku::Sku;

/// All inventory rows as read from the store at one point in time.
///
/// Immutable within an interaction; SKU counting for a submit uses the
/// snapshot the interaction started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    records: Vec<ProductRecord>,
    read_at: DateTime<Utc>,
}

impl InventorySnapshot {
    pub fn new(records: Vec<ProductRecord>, read_at: DateTime<Utc>) -> Self {
        Self { records, read_at }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn read_at(&self) -> DateTime<Utc> {
        self.read_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_sku(&self, sku: &Sku) -> bool {
        self.records.iter().any(|r| r.id() == sku)
    }

    /// Categories present in the rows, first-seen order, blanks skipped.
    pub fn observed_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            let category = record.category.as_str();
            if !category.trim().is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Choices offered in the form: the base table followed by any other
    /// category seen in the rows.
    pub fn category_choices(&self, prefixes: &CategoryPrefixMap) -> Vec<String> {
        let matching = prefixes.matching();
        let mut choices: Vec<String> = prefixes.categories().map(str::to_string).collect();
        for category in self.observed_categories() {
            if !choices.iter().any(|c| matching.matches(c, category)) {
                choices.push(category.to_string());
            }
        }
        choices
    }

    pub fn filter(&self, search: &str) -> Vec<&ProductRecord> {
        filter_records(&self.records, search)
    }
}

/// Rows where any field contains `search`, ignoring case. Empty search keeps everything.
pub fn filter_records<'a>(records: &'a [ProductRecord], search: &str) -> Vec<&'a ProductRecord> {
    if search.is_empty() {
        return records.iter().collect();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}
