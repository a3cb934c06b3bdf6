//! Entity trait: identity that outlives any single read of the store.

/// Entity marker + minimal interface.
///
/// Inventory rows are identified by their SKU. The identity is only as strong
/// as the rule that produced it; nothing here enforces uniqueness.
pub trait Entity {
    /// Identifier type (for inventory rows: the SKU).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
