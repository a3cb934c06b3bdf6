//! Catalog domain module.
//!
//! Business rules for inventory entry: product records, prices, the
//! category→prefix table, SKU generation and snapshot search. Implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod form;
pub mod price;
pub mod record;
pub mod sku;
pub mod snapshot;

pub use category::{CategoryMatching, CategoryPrefixMap, UNKNOWN_CATEGORY_PREFIX};
pub use form::{ProductDraft, ProductForm};
pub use price::Price;
pub use record::{COLUMNS, ProductRecord, RecordDate};
pub use sku::{SKU_COUNTER_WIDTH, Sku, generate_sku};
pub use snapshot::{InventorySnapshot, filter_records};
