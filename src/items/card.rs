//! Capture cards (`InventoryStorable`).
//!
//! A card is the leaf-level storage handle. It owns a shared handle to its
//! container and keeps its `CardId` for life, empty or not.
//!
//! Cards are plain owned values: moving one between slots, flush lists and
//! layout hands is a Rust move, so a card can never be in two places at once.
//! The one sanctioned kind of sharing is the memory proxy, which is a *new*
//! card that points at the real card's container.

use std::rc::Rc;

use crate::core::entity::{CardId, ItemId};

use super::container::{CaptureContainer, SharedContainer};
use super::item::Item;

/// A storage slot handle.
#[derive(Debug)]
pub struct InventoryStorable {
    id: CardId,
    container: SharedContainer,
    proxy_of: Option<CardId>,
}

impl InventoryStorable {
    /// Create an empty card with a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CardId::fresh(),
            container: CaptureContainer::shared(),
            proxy_of: None,
        }
    }

    /// Create a card that already holds an item.
    #[must_use]
    pub fn with_item(item: Item) -> Self {
        let card = Self::new();
        card.container.borrow_mut().capture(item);
        card
    }

    /// Create a proxy card sharing `real`'s container.
    #[must_use]
    pub fn proxy_of(real: &InventoryStorable) -> Self {
        Self {
            id: CardId::fresh(),
            container: Rc::clone(&real.container),
            proxy_of: Some(real.real_id()),
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The card this one stands in for, or its own ID if it is not a proxy.
    #[must_use]
    pub fn real_id(&self) -> CardId {
        self.proxy_of.unwrap_or(self.id)
    }

    #[must_use]
    pub fn is_proxy(&self) -> bool {
        self.proxy_of.is_some()
    }

    #[must_use]
    pub fn container(&self) -> &SharedContainer {
        &self.container
    }

    #[must_use]
    pub fn has_item(&self) -> bool {
        self.container.borrow().has_item()
    }

    #[must_use]
    pub fn item_id(&self) -> Option<ItemId> {
        self.container.borrow().item_id()
    }

    /// Capture an item, returning whatever it displaced.
    pub fn capture(&self, item: Item) -> Option<Item> {
        self.container.borrow_mut().capture(item)
    }

    /// Remove and return the held item.
    pub fn eject(&self) -> Option<Item> {
        self.container.borrow_mut().fetch()
    }
}

impl Default for InventoryStorable {
    fn default() -> Self {
        Self::new()
    }
}
