//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**. Two prices of `12.50` are the same
/// price; two category names with the same text are the same category.
/// They are immutable: to "change" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Price { minor: u64 }
///
/// impl ValueObject for Price {}
///
/// assert_eq!(Price { minor: 1250 }, Price { minor: 1250 });
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
