use serde::Deserialize;

use stockdesk_core::{DomainError, DomainResult};

use crate::price::Price;
use crate::record::{ProductRecord, RecordDate};
use crate::sku::Sku;

/// Raw values collected by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: f64,
    /// Category picked from the offered choices.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text category; wins over `category` when non-blank.
    #[serde(default)]
    pub category_override: Option<String>,
}

/// A form that passed validation, ready to receive a SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Price,
}

impl ProductForm {
    /// Category the record will be filed under.
    ///
    /// The override is trimmed; a selected category is used verbatim so exact
    /// matching sees the same text the choice list offered.
    pub fn resolved_category(&self) -> Option<&str> {
        let overridden = self
            .category_override
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        overridden.or_else(|| {
            self.category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
        })
    }

    pub fn validate(&self) -> DomainResult<ProductDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name required"));
        }

        let category = self
            .resolved_category()
            .ok_or_else(|| DomainError::validation("category required"))?;

        let price = Price::from_major(self.price)?;

        Ok(ProductDraft {
            name: name.to_string(),
            category: category.to_string(),
            price,
        })
    }
}

impl ProductDraft {
    pub fn into_record(self, sku: Sku, added_by: impl Into<String>, date: RecordDate) -> ProductRecord {
        ProductRecord {
            sku,
            name: self.name,
            category: self.category,
            price: self.price,
            added_by: added_by.into(),
            date,
        }
    }
}
