//! Mapping between raw store rows and product records.
//!
//! Reads are lenient: a row is never dropped because one cell is odd, since
//! every row counts toward the next SKU in its category.

use chrono::{DateTime, Utc};

use stockdesk_catalog::{COLUMNS, InventorySnapshot, Price, ProductRecord, RecordDate, Sku};

use super::{StoreError, StoreRow};

/// Header text normalized for lookup: `"Added By"` and `"added_by"` are the same column.
fn header_key(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn cell<'a>(row: &'a StoreRow, column: &str) -> &'a str {
    row.get(column)
        .or_else(|| {
            row.iter()
                .find(|(header, _)| header_key(header) == column)
                .map(|(_, value)| value)
        })
        .map(String::as_str)
        .unwrap_or("")
}

/// Strip a leading currency symbol or other decoration from a price cell.
fn price_text(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '+' || c == '.'))
}

pub fn record_from_row(row: &StoreRow) -> ProductRecord {
    let raw_price = cell(row, "price");
    let price = if raw_price.trim().is_empty() {
        Price::ZERO
    } else {
        price_text(raw_price).parse().unwrap_or_else(|err| {
            tracing::warn!(sku = cell(row, "sku"), price = raw_price, error = %err, "unreadable price cell; showing 0");
            Price::ZERO
        })
    };

    ProductRecord {
        sku: Sku::new(cell(row, "sku")),
        name: cell(row, "name").to_string(),
        category: cell(row, "category").to_string(),
        price,
        added_by: cell(row, "added_by").to_string(),
        date: RecordDate::parse(cell(row, "date")),
    }
}

pub fn snapshot_from_rows(rows: &[StoreRow], read_at: DateTime<Utc>) -> InventorySnapshot {
    InventorySnapshot::new(rows.iter().map(record_from_row).collect(), read_at)
}

/// Zip appended values with the column headers.
pub fn row_from_values(values: Vec<String>) -> Result<StoreRow, StoreError> {
    if values.len() != COLUMNS.len() {
        return Err(StoreError::malformed(format!(
            "expected {} values, got {}",
            COLUMNS.len(),
            values.len()
        )));
    }
    Ok(COLUMNS
        .iter()
        .map(|c| c.to_string())
        .zip(values)
        .collect())
}

/// Turn a header row plus data rows into row mappings.
///
/// Short rows are padded with empty cells, blank rows are skipped and cells
/// under a blank header are ignored.
pub fn rows_from_table(table: Vec<Vec<String>>) -> Vec<StoreRow> {
    let mut iter = table.into_iter();
    let Some(headers) = iter.next() else {
        return Vec::new();
    };

    iter.filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.trim().is_empty())
                .map(|(idx, header)| (header.clone(), cells.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
