//! Composite storable: an ordered group governed by a ruleset.
//!
//! Child order is the layout order. Every operation that touches a child
//! follows the same pattern: pull the child out, operate on it, then ask the
//! ruleset where it goes back. That lets rulesets implement orderings such as
//! "most recently used first" without the group knowing about them.

use std::any::Any;

use tracing::{debug, warn};

use crate::core::config::StorableGroupDefinition;
use crate::core::entity::{CardId, StorableId, TextureId};
use crate::core::error::{Result, StorageError};
use crate::core::geometry::Vec3;
use crate::items::{InventoryStorable, Item};
use crate::rulesets::{self, GroupRuleset};

use super::{log_drain, FlipOutcome, Storable, StoreResult};

/// A group of child storables.
#[derive(Debug)]
pub struct StorableGroup {
    id: StorableId,
    definition: StorableGroupDefinition,
    children: Vec<Storable>,
    ruleset: Box<dyn GroupRuleset>,
}

impl StorableGroup {
    /// Validate `definition` and build an empty group from it.
    pub fn new(definition: StorableGroupDefinition) -> Result<Self> {
        definition.validate()?;
        Ok(Self::build(definition))
    }

    /// Build without validation; callers guarantee `definition` is valid.
    pub(crate) fn build(definition: StorableGroupDefinition) -> Self {
        let ruleset = rulesets::build(&definition.ruleset);
        Self {
            id: StorableId::fresh(),
            definition,
            children: Vec::new(),
            ruleset,
        }
    }

    #[must_use]
    pub fn id(&self) -> StorableId {
        self.id
    }

    #[must_use]
    pub fn definition(&self) -> &StorableGroupDefinition {
        &self.definition
    }

    #[must_use]
    pub fn children(&self) -> &[Storable] {
        &self.children
    }

    /// The ruleset state, if it is an `S`.
    ///
    /// ```
    /// use capturellection::core::{MemorySettings, RulesetKind, StorableDefinition, StorableGroupDefinition};
    /// use capturellection::rulesets::{ArrayState, MemoryState};
    /// use capturellection::storage::StorableGroup;
    ///
    /// let definition = StorableGroupDefinition::new("board", 4, StorableDefinition::slot())
    ///     .with_ruleset(RulesetKind::Memory(MemorySettings::default()));
    /// let group = StorableGroup::new(definition).unwrap();
    ///
    /// assert!(group.ruleset_state::<MemoryState>().is_some());
    /// assert!(group.ruleset_state::<ArrayState>().is_none());
    /// ```
    #[must_use]
    pub fn ruleset_state<S: Any>(&self) -> Option<&S> {
        self.ruleset.state_any().downcast_ref::<S>()
    }

    // === Queries ===

    #[must_use]
    pub fn max_possible_size(&self) -> Vec3 {
        self.ruleset.max_possible_size_of(&self.children)
    }

    #[must_use]
    pub fn inventory_count(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn has_no_cards(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn has_all_cards(&self) -> bool {
        self.children.len() == self.definition.max_storables
            && self.children.iter().all(Storable::has_all_cards)
    }

    #[must_use]
    pub fn has_all_cards_empty(&self) -> bool {
        self.children.iter().all(Storable::has_all_cards_empty)
    }

    #[must_use]
    pub fn has_all_cards_full(&self) -> bool {
        self.children.iter().all(Storable::has_all_cards_full)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.children.iter().any(|child| child.contains(card))
    }

    #[must_use]
    pub fn can_fetch(&self, card: CardId) -> bool {
        self.ruleset.can_fetch_from(&self.children, card)
    }

    #[must_use]
    pub fn card_textures(&self, card: CardId) -> Vec<TextureId> {
        let mut textures = self.ruleset.card_textures();
        if let Some(child) = self.children.iter().find(|child| child.contains(card)) {
            textures.extend(child.card_textures(card));
        }
        textures
    }

    pub(crate) fn layout_into(&self, origin: Vec3, out: &mut Vec<(CardId, Vec3)>) {
        let offsets = self.ruleset.layout(&self.children);
        for (child, offset) in self.children.iter().zip(offsets) {
            child.layout_into(origin + offset, out);
        }
    }

    /// Whether one more created storable, after the ruleset's hooks, still fits.
    fn has_room_to_grow(&self) -> bool {
        self.children.len() + self.ruleset.storables_per_created() <= self.definition.max_storables
    }

    fn index_of(&self, card: CardId) -> Result<usize> {
        self.children
            .iter()
            .position(|child| child.contains(card))
            .ok_or(StorageError::CardNotFound(card))
    }

    // === Operations ===

    pub fn store(&mut self, item: Item) -> Result<StoreResult> {
        if self.children.is_empty() {
            warn!(group = %self.definition.name, "store into a group without storables");
            return Err(StorageError::NoCardInSlot(self.id));
        }

        self.ruleset.before_store(&mut self.children);
        let store_index = self.ruleset.index_to_store_into(&self.children).min(self.children.len() - 1);
        let mut child = self.children.remove(store_index);

        let result = child.store(item);
        let restore_index = self
            .ruleset
            .index_to_insert_after_store(&self.children, &child, store_index)
            .min(self.children.len());
        self.children.insert(restore_index, child);
        let mut result = result?;

        debug!(
            group = %self.definition.name,
            store_index,
            restore_index,
            card = %result.card,
            "stored into group"
        );

        if let Some(mut ejected) = result.ejected.take() {
            if let Some(card) = ejected.take_card() {
                let mut cards = vec![card];
                self.flush_from(&mut cards, store_index);
                match cards.pop() {
                    Some(card) => {
                        ejected.attach_card(card);
                        result.ejected = Some(ejected);
                    }
                    None => debug!(group = %self.definition.name, item = %ejected.id(), "ejected card absorbed"),
                }
            } else {
                result.ejected = Some(ejected);
            }
        }

        Ok(result)
    }

    pub fn fetch(&mut self, card: CardId) -> Result<Option<Item>> {
        let fetch_index = self.index_of(card)?;
        if !self.can_fetch(card) {
            warn!(group = %self.definition.name, %card, "fetch refused by ruleset");
            return Err(StorageError::CannotFetch(card));
        }

        self.ruleset.before_fetch(&self.children, card);
        let mut child = self.children.remove(fetch_index);

        let item = child.fetch(card);
        let restore_index = self
            .ruleset
            .index_to_insert_after_fetch(&self.children, &child, fetch_index)
            .min(self.children.len());
        self.children.insert(restore_index, child);

        debug!(group = %self.definition.name, %card, fetch_index, restore_index, "fetched from group");
        item
    }

    pub fn flush(&mut self, cards: &mut Vec<InventoryStorable>) {
        self.flush_from(cards, 0);
    }

    /// Flush, visiting existing children starting at `original_index` and
    /// wrapping around.
    pub fn flush_from(&mut self, cards: &mut Vec<InventoryStorable>, original_index: usize) {
        if self.has_all_cards() || cards.is_empty() {
            return;
        }
        let before = cards.len();

        let len = self.children.len();
        for offset in 0..len {
            self.children[(original_index + offset) % len].flush(cards);
            if cards.is_empty() {
                break;
            }
        }

        while self.has_room_to_grow() && !cards.is_empty() {
            let mut child = Storable::from_definition(&self.definition.subdefinition);
            child.flush(cards);
            for grown in self.ruleset.flush_storable_hook(child) {
                let insert_index = self
                    .ruleset
                    .index_to_flush_between(&self.children, &grown)
                    .min(self.children.len());
                self.children.insert(insert_index, grown);
            }
        }

        log_drain("flush", self.id, before, cards.len());
    }

    pub fn load(&mut self, cards: &mut Vec<InventoryStorable>) {
        if self.has_all_cards() || cards.is_empty() {
            return;
        }
        let before = cards.len();

        for child in &mut self.children {
            child.load(cards);
            if cards.is_empty() {
                break;
            }
        }

        while self.has_room_to_grow() && !cards.is_empty() {
            let mut child = Storable::from_definition(&self.definition.subdefinition);
            child.load(cards);
            let produced = self.ruleset.load_storable_hook(child);
            self.children.extend(produced);
        }

        log_drain("load", self.id, before, cards.len());
    }

    pub fn save(&mut self, cards: &mut Vec<InventoryStorable>) {
        if self.has_no_cards() {
            return;
        }
        let before = cards.len();

        for child in std::mem::take(&mut self.children) {
            for mut restored in self.ruleset.save_storable_hook(child) {
                restored.save(cards);
            }
        }

        debug!(group = %self.definition.name, saved = cards.len() - before, "group saved");
    }

    pub fn flip(&mut self, card: CardId) -> Result<FlipOutcome> {
        let index = self.index_of(card)?;
        match self.ruleset.flip(&self.children, card) {
            FlipOutcome::NotFlippable => self.children[index].flip(card),
            outcome => Ok(outcome),
        }
    }

    pub fn take_card(&mut self, card: CardId) -> Option<InventoryStorable> {
        let index = self.index_of(card).ok()?;
        self.children[index].take_card(card)
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.ruleset.tick(&self.children, delta_time);
        for child in &mut self.children {
            child.tick(delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{RulesetKind, MemorySettings, StorableDefinition};
    use crate::core::entity::ItemId;

    fn row(max: usize) -> StorableGroup {
        StorableGroup::new(StorableGroupDefinition::new("row", max, StorableDefinition::slot())).unwrap()
    }

    fn cards(count: usize) -> Vec<InventoryStorable> {
        (0..count).map(|_| InventoryStorable::new()).collect()
    }

    impl StorableGroup {
        /// Test-only: depth-first cards under this group, via `Storable::cards`.
        fn cards(&self) -> impl Iterator<Item = &InventoryStorable> {
            self.children().iter().flat_map(Storable::cards)
        }
    }

    #[test]
    fn test_new_validates() {
        let result = StorableGroup::new(StorableGroupDefinition::new("bad", 0, StorableDefinition::slot()));
        assert!(matches!(result, Err(StorageError::InvalidDefinition(_))));
    }

    #[test]
    fn test_store_into_empty_group_fails() {
        let mut group = row(2);
        let result = group.store(Item::new(ItemId::new(1), "orb"));
        assert_eq!(result.unwrap_err(), StorageError::NoCardInSlot(group.id()));
    }

    #[test]
    fn test_flush_grows_to_capacity() {
        let mut group = row(3);
        let mut pending = cards(5);
        group.flush(&mut pending);

        assert_eq!(group.inventory_count(), 3);
        assert!(group.has_all_cards());
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_flush_from_wraps_around() {
        let mut group = row(3);
        let mut pending = cards(3);
        group.load(&mut pending);

        // Empty the middle and last slots, then refill starting from the last.
        let ids: Vec<_> = group.cards().map(InventoryStorable::id).collect();
        let second = group.take_card(ids[1]).unwrap();
        let third = group.take_card(ids[2]).unwrap();
        let mut pending = vec![third, second];
        group.flush_from(&mut pending, 2);

        let after: Vec<_> = group.cards().map(InventoryStorable::id).collect();
        assert_eq!(after, vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_store_ejected_card_is_absorbed() {
        let mut group = row(2);
        let mut pending = cards(1);
        group.load(&mut pending);

        group.store(Item::new(ItemId::new(1), "first")).unwrap();

        // Storing a card-item over the only full slot ejects "first"; a plain
        // item comes back to the caller.
        let result = group.store(Item::new(ItemId::new(2), "second")).unwrap();
        assert_eq!(result.ejected.map(|i| i.id()), Some(ItemId::new(1)));

        // Now eject an item that is itself a card: it lands in the free capacity.
        let spare = InventoryStorable::new();
        let spare_id = spare.id();
        group.store(Item::from_card(ItemId::new(3), "spare", spare)).unwrap();
        let result = group.store(Item::new(ItemId::new(4), "fourth")).unwrap();

        assert!(result.ejected.is_none());
        assert!(group.contains(spare_id));
        assert_eq!(group.inventory_count(), 2);
    }

    #[test]
    fn test_save_empties_group() {
        let mut group = row(4);
        let mut pending = cards(4);
        group.load(&mut pending);

        let mut saved = Vec::new();
        group.save(&mut saved);
        assert_eq!(saved.len(), 4);
        assert!(group.has_no_cards());
    }

    #[test]
    fn test_memory_load_duplicates() {
        let definition = StorableGroupDefinition::new("board", 4, StorableDefinition::slot())
            .with_ruleset(RulesetKind::Memory(MemorySettings::default()));
        let mut group = StorableGroup::new(definition).unwrap();
        let mut pending = cards(2);
        group.load(&mut pending);

        assert!(pending.is_empty());
        assert_eq!(group.inventory_count(), 4);
        assert!(group.cards().all(InventoryStorable::is_proxy));
    }

    #[test]
    fn test_card_textures_stack_by_depth() {
        use crate::core::config::ArraySettings;

        let inner = StorableGroupDefinition::new("inner", 1, StorableDefinition::slot()).with_ruleset(
            RulesetKind::Array(ArraySettings {
                textures: vec![TextureId::new(2)],
                ..ArraySettings::default()
            }),
        );
        let outer = StorableGroupDefinition::new("outer", 1, StorableDefinition::group(inner)).with_ruleset(
            RulesetKind::Array(ArraySettings {
                textures: vec![TextureId::new(1)],
                ..ArraySettings::default()
            }),
        );
        let mut group = StorableGroup::new(outer).unwrap();
        let card = InventoryStorable::new();
        let id = card.id();
        group.load(&mut vec![card]);

        assert_eq!(group.card_textures(id), vec![TextureId::new(1), TextureId::new(2)]);
        assert_eq!(group.card_textures(CardId::fresh()), vec![TextureId::new(1)]);
    }
}
