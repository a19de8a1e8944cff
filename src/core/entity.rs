//! Identifiers for everything the storage tree tracks.
//!
//! ## ID Allocation
//!
//! - `ItemId`: assigned by the world that owns the item; the engine never
//!   allocates these.
//! - `CardId` and `StorableId`: allocated from process-wide counters so that
//!   storables synthesized deep inside a flush (or proxies created by the
//!   memory layer) never collide with ones created by the caller.
//!
//! ## Usage
//!
//! ```
//! use capturellection::core::{CardId, StorableId};
//!
//! let a = CardId::fresh();
//! let b = CardId::fresh();
//! assert_ne!(a, b);
//!
//! let s = StorableId::fresh();
//! assert!(s.raw() > 0);
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_CARD: AtomicU32 = AtomicU32::new(1);
static NEXT_STORABLE: AtomicU32 = AtomicU32::new(1);

/// Identity of a capturable item.
///
/// Items are owned by the world, not by the storage tree. The tree only
/// moves them between containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Create a new item ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// Identity of a capture card (an `InventoryStorable`).
///
/// Stable for the card's whole life, whether or not it holds an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Allocate a card ID that has never been handed out before.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_CARD.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identity of a node in a storage tree.
///
/// Used as the key for ruleset bookkeeping (pairs, flips) so rulesets never
/// hold references into the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorableId(pub u32);

impl StorableId {
    /// Allocate a storable ID that has never been handed out before.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_STORABLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StorableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Storable({})", self.0)
    }
}

/// Texture handle contributed by a ruleset to a card's face.
///
/// Opaque to the engine; the presentation layer maps it to real art.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u16);

impl TextureId {
    /// Create a new texture ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let ids: Vec<_> = (0..100).map(|_| CardId::fresh()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn test_storable_ids_increase() {
        let a = StorableId::fresh();
        let b = StorableId::fresh();
        assert!(b > a);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ItemId::new(7)), "Item(7)");
        assert_eq!(format!("{}", CardId(3)), "Card(3)");
        assert_eq!(format!("{}", StorableId(9)), "Storable(9)");
    }

    #[test]
    fn test_serialization() {
        let id = ItemId::new(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
