//! Capture containers.
//!
//! A container holds at most one item. Containers are shared handles so a
//! memory proxy card can point at the same container as the real card it
//! stands in for: capturing through either card is visible through both,
//! and the item itself is never duplicated.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::entity::ItemId;

use super::item::Item;

/// Shared, single-threaded handle to a container.
pub type SharedContainer = Rc<RefCell<CaptureContainer>>;

/// Holds zero or one captured item.
#[derive(Debug, Default)]
pub struct CaptureContainer {
    item: Option<Item>,
}

impl CaptureContainer {
    /// Create an empty container behind a shared handle.
    #[must_use]
    pub fn shared() -> SharedContainer {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Capture an item, returning whatever it displaced.
    pub fn capture(&mut self, item: Item) -> Option<Item> {
        self.item.replace(item)
    }

    /// Remove and return the held item.
    pub fn fetch(&mut self) -> Option<Item> {
        self.item.take()
    }

    #[must_use]
    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }

    #[must_use]
    pub fn item_id(&self) -> Option<ItemId> {
        self.item.as_ref().map(Item::id)
    }

    #[must_use]
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }
}
