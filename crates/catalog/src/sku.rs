//! SKU generation.
//!
//! A SKU is the category prefix (decimal, no leading zeros) followed by a
//! per-category counter zero-padded to [`SKU_COUNTER_WIDTH`] digits. The
//! counter is one more than the number of rows already in that category.
//!
//! Two callers working from the same snapshot produce the same SKU. Nothing
//! here can prevent that; the session offers an opt-in recheck against the
//! store right before appending.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::category::CategoryPrefixMap;
use crate::record::ProductRecord;

/// Minimum width of the counter part. Wider counters are kept whole.
pub const SKU_COUNTER_WIDTH: usize = 3;

/// Stock-keeping unit code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Wrap a SKU read back from the store (any text is accepted).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `prefix` followed by `counter` padded to [`SKU_COUNTER_WIDTH`] digits.
    pub fn compose(prefix: u32, counter: u64) -> Self {
        Self(format!("{prefix}{counter:0width$}", width = SKU_COUNTER_WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Next SKU for `category` given the rows in `snapshot`.
pub fn generate_sku(
    snapshot: &[ProductRecord],
    category: &str,
    prefixes: &CategoryPrefixMap,
) -> Sku {
    let matching = prefixes.matching();
    let prefix = prefixes.prefix_for(category);
    let existing = snapshot
        .iter()
        .filter(|record| matching.matches(&record.category, category))
        .count() as u64;

    Sku::compose(prefix, existing + 1)
}
