use serde::{Deserialize, Serialize};

use stockdesk_catalog::{ProductForm, ProductRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_override: Option<String>,
}

impl From<CreateProductRequest> for ProductForm {
    fn from(req: CreateProductRequest) -> Self {
        ProductForm {
            name: req.name,
            price: req.price,
            category: req.category,
            category_override: req.category_override,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// One table row as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryRow {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub price_display: String,
    pub added_by: String,
    pub date: String,
}

impl InventoryRow {
    pub fn from_record(record: &ProductRecord, currency_symbol: &str) -> Self {
        Self {
            sku: record.sku.to_string(),
            name: record.name.clone(),
            category: record.category.clone(),
            price: record.price.to_string(),
            price_display: record.price.format_currency(currency_symbol),
            added_by: record.added_by.clone(),
            date: record.date.to_string(),
        }
    }
}
