//! Leaf storable: one slot for one card.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::entity::{CardId, StorableId};
use crate::core::error::{Result, StorageError};
use crate::core::geometry::Vec3;
use crate::items::{InventoryStorable, Item};

use super::{FlipOutcome, StoreResult};

/// A slot that holds at most one card.
#[derive(Debug)]
pub struct CardSlot {
    id: StorableId,
    card: Option<InventoryStorable>,
    card_size: Vec3,
}

impl CardSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new(card_size: Vec3) -> Self {
        Self {
            id: StorableId::fresh(),
            card: None,
            card_size,
        }
    }

    #[must_use]
    pub fn id(&self) -> StorableId {
        self.id
    }

    #[must_use]
    pub fn card(&self) -> Option<&InventoryStorable> {
        self.card.as_ref()
    }

    #[must_use]
    pub fn card_size(&self) -> Vec3 {
        self.card_size
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.card.as_ref().is_some_and(|held| held.id() == card)
    }

    /// Capture `item` into this slot's card, displacing any held item.
    pub fn store(&mut self, item: Item) -> Result<StoreResult> {
        let Some(card) = self.card.as_ref() else {
            warn!(slot = %self.id, "store into a slot without a card");
            return Err(StorageError::NoCardInSlot(self.id));
        };
        let item_id = item.id();
        let ejected = card.capture(item);
        debug!(card = %card.id(), item = %item_id, displaced = ejected.is_some(), "item stored");
        Ok(StoreResult {
            card: card.id(),
            container: Rc::clone(card.container()),
            ejected,
        })
    }

    pub fn fetch(&mut self, card: CardId) -> Result<Option<Item>> {
        match self.card.as_ref() {
            Some(held) if held.id() == card => Ok(held.eject()),
            _ => Err(StorageError::CardNotFound(card)),
        }
    }

    /// Take the first pending card if this slot is free.
    pub fn flush(&mut self, cards: &mut Vec<InventoryStorable>) {
        if self.card.is_none() && !cards.is_empty() {
            self.card = Some(cards.remove(0));
        }
    }

    pub fn save(&mut self, cards: &mut Vec<InventoryStorable>) {
        if let Some(card) = self.card.take() {
            cards.push(card);
        }
    }

    pub fn flip(&mut self, card: CardId) -> Result<FlipOutcome> {
        if self.contains(card) {
            Ok(FlipOutcome::NotFlippable)
        } else {
            Err(StorageError::CardNotFound(card))
        }
    }

    pub fn take_card(&mut self, card: CardId) -> Option<InventoryStorable> {
        if self.contains(card) {
            self.card.take()
        } else {
            None
        }
    }
}
