use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult};

/// Prefix used for any category missing from the table.
pub const UNKNOWN_CATEGORY_PREFIX: u32 = 99;

/// How category names are compared, both for prefix lookup and for counting.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMatching {
    /// Case-sensitive, byte-for-byte equality. `"מזון "` and `"מזון"` are different categories.
    #[default]
    Exact,
    /// Trim surrounding whitespace and lowercase before comparing.
    Normalized,
}

impl CategoryMatching {
    /// Comparison key for a category name under this policy.
    pub fn key<'a>(self, category: &'a str) -> Cow<'a, str> {
        match self {
            CategoryMatching::Exact => Cow::Borrowed(category),
            CategoryMatching::Normalized => Cow::Owned(category.trim().to_lowercase()),
        }
    }

    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            CategoryMatching::Exact => a == b,
            CategoryMatching::Normalized => self.key(a) == self.key(b),
        }
    }
}

impl FromStr for CategoryMatching {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(CategoryMatching::Exact),
            "normalized" => Ok(CategoryMatching::Normalized),
            other => Err(DomainError::validation(format!(
                "category matching must be one of: exact, normalized (got '{other}')"
            ))),
        }
    }
}

/// Fixed category → numeric SKU prefix table.
///
/// Entry order is the order categories are offered to the user. The table is
/// immutable once built and is handed to the SKU generator explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPrefixMap {
    entries: Vec<(String, u32)>,
    matching: CategoryMatching,
}

impl CategoryPrefixMap {
    pub fn new(
        entries: impl IntoIterator<Item = (String, u32)>,
        matching: CategoryMatching,
    ) -> DomainResult<Self> {
        let entries: Vec<(String, u32)> = entries.into_iter().collect();

        for (idx, (name, _)) in entries.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "category name cannot be empty (entry {idx})"
                )));
            }
            let duplicate = entries[..idx]
                .iter()
                .any(|(earlier, _)| matching.matches(earlier, name));
            if duplicate {
                return Err(DomainError::validation(format!(
                    "category '{name}' appears more than once"
                )));
            }
        }

        Ok(Self { entries, matching })
    }

    /// The built-in table.
    pub fn standard() -> Self {
        let entries = [
            ("כללי", 10),
            ("מזון", 20),
            ("משקאות", 30),
            ("ניקיון", 40),
            ("אלקטרוניקה", 50),
            ("משרד", 60),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(name, prefix)| (name.to_string(), prefix))
                .collect(),
            matching: CategoryMatching::Exact,
        }
    }

    /// Parse `name=prefix,name=prefix`.
    pub fn parse(text: &str, matching: CategoryMatching) -> DomainResult<Self> {
        let mut entries = Vec::new();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, prefix) = part.split_once('=').ok_or_else(|| {
                DomainError::validation(format!("expected name=prefix, got '{part}'"))
            })?;
            let prefix: u32 = prefix.trim().parse().map_err(|_| {
                DomainError::validation(format!("prefix for '{}' is not a number", name.trim()))
            })?;
            entries.push((name.trim().to_string(), prefix));
        }
        if entries.is_empty() {
            return Err(DomainError::validation("category table is empty"));
        }
        Self::new(entries, matching)
    }

    /// Same table under a different matching policy.
    pub fn with_matching(self, matching: CategoryMatching) -> DomainResult<Self> {
        Self::new(self.entries, matching)
    }

    pub fn matching(&self) -> CategoryMatching {
        self.matching
    }

    /// Prefix for `category`, or [`UNKNOWN_CATEGORY_PREFIX`].
    pub fn prefix_for(&self, category: &str) -> u32 {
        self.entries
            .iter()
            .find(|(name, _)| self.matching.matches(name, category))
            .map(|(_, prefix)| *prefix)
            .unwrap_or(UNKNOWN_CATEGORY_PREFIX)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries
            .iter()
            .any(|(name, _)| self.matching.matches(name, category))
    }

    /// Base category list, in table order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Default for CategoryPrefixMap {
    fn default() -> Self {
        Self::standard()
    }
}
