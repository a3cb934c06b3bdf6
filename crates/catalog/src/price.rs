use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, ValueObject};

/// Non-negative price, held in minor units (hundredths of the currency unit).
///
/// The canonical text form is always two decimals (`"12.50"`); that is what
/// gets written to the store and what search matches against.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl ValueObject for Price {}

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Build a price from a major-unit number as entered in the form.
    ///
    /// Rounds to the nearest hundredth.
    pub fn from_major(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        let minor = (value * 100.0).round();
        if minor >= u64::MAX as f64 {
            return Err(DomainError::validation("price is too large"));
        }
        Ok(Self(minor as u64))
    }

    /// Render for display, e.g. `₪1,234.50`.
    pub fn format_currency(&self, symbol: &str) -> String {
        format!(
            "{symbol}{}.{:02}",
            group_thousands(self.0 / 100),
            self.0 % 100
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    /// Parses store cells and form text: `"12"`, `"12.5"`, `"1,234.50"`, `"1e3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(DomainError::validation("price is empty"));
        }
        if cleaned.starts_with('-') {
            return Err(DomainError::validation("price cannot be negative"));
        }
        let body = cleaned.strip_prefix('+').unwrap_or(cleaned.as_str());

        match parse_decimal(body) {
            Some(price) => Ok(price),
            None => body
                .parse::<f64>()
                .map_err(|_| DomainError::validation(format!("invalid price: {s}")))
                .and_then(Price::from_major),
        }
    }
}

/// Exact decimal parse; a third fractional digit rounds half up, the rest are ignored.
fn parse_decimal(s: &str) -> Option<Price> {
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let units: u64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let mut digits = frac_part.bytes().map(|b| u64::from(b - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);

    let minor = units
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + u64::from(round_up))?;
    Some(Price(minor))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
