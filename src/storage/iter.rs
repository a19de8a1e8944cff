//! Depth-first card traversal.

use std::slice;

use crate::items::InventoryStorable;

use super::Storable;

/// Iterator over every card under a storable, depth first, in child order.
///
/// Borrowing and cheap to recreate: call [`Storable::cards`] again to restart.
#[derive(Debug)]
pub struct Cards<'a> {
    pending: Option<&'a InventoryStorable>,
    stack: Vec<slice::Iter<'a, Storable>>,
}

impl<'a> Cards<'a> {
    pub(crate) fn new(root: &'a Storable) -> Self {
        match root {
            Storable::Slot(slot) => Self {
                pending: slot.card(),
                stack: Vec::new(),
            },
            Storable::Group(group) => Self {
                pending: None,
                stack: vec![group.children().iter()],
            },
        }
    }
}

impl<'a> Iterator for Cards<'a> {
    type Item = &'a InventoryStorable;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(card) = self.pending.take() {
            return Some(card);
        }
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Storable::Slot(slot)) => {
                    if let Some(card) = slot.card() {
                        return Some(card);
                    }
                }
                Some(Storable::Group(group)) => self.stack.push(group.children().iter()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::{StorableDefinition, StorableGroupDefinition};
    use crate::items::InventoryStorable;
    use crate::storage::Storable;

    #[test]
    fn test_depth_first_order() {
        let inner = StorableGroupDefinition::new("pair", 2, StorableDefinition::slot());
        let outer = StorableGroupDefinition::new("rows", 3, StorableDefinition::group(inner));
        let mut root = Storable::group(outer).unwrap();

        let cards: Vec<_> = (0..5).map(|_| InventoryStorable::new()).collect();
        let expected: Vec<_> = cards.iter().map(InventoryStorable::id).collect();
        let mut pending = cards;
        root.load(&mut pending);

        let visited: Vec<_> = root.cards().map(InventoryStorable::id).collect();
        assert_eq!(visited, expected);

        // Restartable
        assert_eq!(root.cards().count(), 5);
    }

    #[test]
    fn test_empty_slot_yields_nothing() {
        let slot = Storable::from_definition(&StorableDefinition::slot());
        assert_eq!(slot.cards().count(), 0);
    }
}
