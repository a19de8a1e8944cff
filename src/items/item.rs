//! Capturable items.
//!
//! An `Item` is owned by the world; the storage tree only carries it from
//! container to container. Some items are themselves capture cards (a card
//! can be captured into another card), in which case the item carries the
//! card and the tree can absorb it back into free capacity.

use crate::core::entity::ItemId;

use super::card::InventoryStorable;

/// An opaque capturable entity.
///
/// Identity is the `ItemId`; two items compare equal iff their IDs match.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    name: String,
    card: Option<Box<InventoryStorable>>,
}

impl Item {
    /// Create a plain item.
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            card: None,
        }
    }

    /// Wrap a capture card so it can itself be captured.
    pub fn from_card(id: ItemId, name: impl Into<String>, card: InventoryStorable) -> Self {
        Self {
            id,
            name: name.into(),
            card: Some(Box::new(card)),
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Is this item a capture card?
    #[must_use]
    pub fn is_card(&self) -> bool {
        self.card.is_some()
    }

    /// Detach the capture card this item carries, if any.
    pub fn take_card(&mut self) -> Option<InventoryStorable> {
        self.card.take().map(|card| *card)
    }

    /// Re-attach a card previously taken with `take_card`.
    pub fn attach_card(&mut self, card: InventoryStorable) {
        self.card = Some(Box::new(card));
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Item::new(ItemId::new(1), "apple");
        let b = Item::new(ItemId::new(1), "renamed apple");
        let c = Item::new(ItemId::new(2), "apple");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_take_and_attach_card() {
        let card = InventoryStorable::new();
        let card_id = card.id();

        let mut item = Item::from_card(ItemId::new(5), "spare card", card);
        assert!(item.is_card());

        let taken = item.take_card().unwrap();
        assert_eq!(taken.id(), card_id);
        assert!(!item.is_card());

        item.attach_card(taken);
        assert!(item.is_card());

        let mut plain = Item::new(ItemId::new(6), "hat");
        assert!(plain.take_card().is_none());
    }
}
