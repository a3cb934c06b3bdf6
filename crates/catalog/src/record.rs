use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockdesk_core::{Entity, ValueObject};

use crate::price::Price;
use crate::sku::Sku;

/// Store column order. Appends are written in exactly this order.
pub const COLUMNS: [&str; 6] = ["sku", "name", "category", "price", "added_by", "date"];

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Date a record was added, rendered `DD/MM/YYYY`.
///
/// Rows written by hand into the sheet may hold anything in the date column;
/// those keep their raw text instead of failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordDate {
    Day(NaiveDate),
    Raw(String),
}

impl ValueObject for RecordDate {}

impl RecordDate {
    pub fn parse(text: &str) -> Self {
        match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
            Ok(day) => RecordDate::Day(day),
            Err(_) => RecordDate::Raw(text.to_string()),
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Day(day) => Some(*day),
            RecordDate::Raw(_) => None,
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(day: NaiveDate) -> Self {
        RecordDate::Day(day)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Day(day) => write!(f, "{}", day.format(DATE_FORMAT)),
            RecordDate::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<RecordDate> for String {
    fn from(date: RecordDate) -> Self {
        date.to_string()
    }
}

impl From<String> for RecordDate {
    fn from(text: String) -> Self {
        RecordDate::parse(&text)
    }
}

/// One inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub added_by: String,
    pub date: RecordDate,
}

impl Entity for ProductRecord {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

impl ProductRecord {
    /// Field values in [`COLUMNS`] order, as written to the store.
    pub fn field_values(&self) -> Vec<String> {
        vec![
            self.sku.to_string(),
            self.name.clone(),
            self.category.clone(),
            self.price.to_string(),
            self.added_by.clone(),
            self.date.to_string(),
        ]
    }

    /// True if any field's text contains `needle_lower` (already lowercased).
    pub fn matches_lowercase(&self, needle_lower: &str) -> bool {
        self.field_values()
            .iter()
            .any(|value| value.to_lowercase().contains(needle_lower))
    }
}
