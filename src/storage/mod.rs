//! The storage tree.
//!
//! A [`Storable`] is either a single card slot or a group of storables. Both
//! answer the same contract, so trees nest to any depth without special
//! cases:
//!
//! - `store` / `fetch`: move an item in or out, consulting rulesets on the
//!   way down and back up.
//! - `flush`: drain a list of pending cards into free capacity, growing the
//!   tree from its definitions as needed.
//! - `load` / `save`: policy-free bulk population and drain, used to rebuild
//!   a tree from (or flatten it into) a plain list of cards.
//! - `can_fetch` / `contains`: pure queries.
//! - `tick`: advance time-driven ruleset state.
//!
//! ## Ownership
//!
//! Cards are moved, never cloned, so the tree cannot hold a card twice or
//! lose one. Every `&mut` operation has exclusive access to its subtree for
//! its whole duration; there is no way to re-enter a subtree mid-operation.
//!
//! ## Example
//!
//! ```
//! use capturellection::core::{ItemId, StorableDefinition, StorableGroupDefinition};
//! use capturellection::items::{InventoryStorable, Item};
//! use capturellection::storage::Storable;
//!
//! let definition = StorableGroupDefinition::new("row", 3, StorableDefinition::slot());
//! let mut deque = Storable::group(definition).unwrap();
//!
//! let mut cards: Vec<_> = (0..3).map(|_| InventoryStorable::new()).collect();
//! deque.load(&mut cards);
//! assert!(cards.is_empty());
//!
//! let stored = deque.store(Item::new(ItemId::new(1), "sword")).unwrap();
//! let item = deque.fetch(stored.card).unwrap();
//! assert_eq!(item.map(|i| i.id()), Some(ItemId::new(1)));
//! ```

mod slot;
mod group;
mod iter;

pub use slot::CardSlot;
pub use group::StorableGroup;
pub use iter::Cards;

use tracing::debug;

use crate::core::config::{StorableDefinition, StorableGroupDefinition};
use crate::core::entity::{CardId, StorableId, TextureId};
use crate::core::error::Result;
use crate::core::geometry::Vec3;
use crate::items::{InventoryStorable, Item, SharedContainer};

/// Outcome of a successful store.
#[derive(Debug)]
pub struct StoreResult {
    /// The card the item now sits in.
    pub card: CardId,

    /// That card's container.
    pub container: SharedContainer,

    /// An item displaced to make room, which the caller now owns.
    pub ejected: Option<Item>,
}

/// Outcome of flipping a card on a memory board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// No ruleset on the path to the card supports flipping.
    NotFlippable,
    /// The flip was applied (or ignored); nothing is authorized yet.
    NoOp,
    /// The card's storable and its pair are both face up.
    Matched(StorableId),
}

/// A node in a storage tree.
#[derive(Debug)]
pub enum Storable {
    Slot(CardSlot),
    Group(StorableGroup),
}

impl Storable {
    /// Build an empty node from a definition.
    ///
    /// The definition is assumed valid; use [`Storable::group`] at the root to
    /// validate it.
    #[must_use]
    pub fn from_definition(definition: &StorableDefinition) -> Self {
        match definition {
            StorableDefinition::Slot { card_size } => Storable::Slot(CardSlot::new(*card_size)),
            StorableDefinition::Group(group) => Storable::Group(StorableGroup::build(group.as_ref().clone())),
        }
    }

    /// Validate a group definition and build an empty root from it.
    pub fn group(definition: StorableGroupDefinition) -> Result<Self> {
        StorableGroup::new(definition).map(Storable::Group)
    }

    /// An empty node with the same definition as this one.
    #[must_use]
    pub fn new_like_this(&self) -> Self {
        match self {
            Storable::Slot(slot) => Storable::Slot(CardSlot::new(slot.card_size())),
            Storable::Group(group) => Storable::Group(StorableGroup::build(group.definition().clone())),
        }
    }

    #[must_use]
    pub fn id(&self) -> StorableId {
        match self {
            Storable::Slot(slot) => slot.id(),
            Storable::Group(group) => group.id(),
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&StorableGroup> {
        match self {
            Storable::Group(group) => Some(group),
            Storable::Slot(_) => None,
        }
    }

    // === Queries ===

    /// Bounding extent of this node once laid out.
    #[must_use]
    pub fn max_possible_size(&self) -> Vec3 {
        match self {
            Storable::Slot(slot) => slot.card_size(),
            Storable::Group(group) => group.max_possible_size(),
        }
    }

    /// Number of direct children (groups) or held cards (slots).
    #[must_use]
    pub fn inventory_count(&self) -> usize {
        match self {
            Storable::Slot(slot) => usize::from(slot.card().is_some()),
            Storable::Group(group) => group.inventory_count(),
        }
    }

    #[must_use]
    pub fn has_no_cards(&self) -> bool {
        match self {
            Storable::Slot(slot) => slot.card().is_none(),
            Storable::Group(group) => group.has_no_cards(),
        }
    }

    /// Is every possible position filled with a card?
    #[must_use]
    pub fn has_all_cards(&self) -> bool {
        match self {
            Storable::Slot(slot) => slot.card().is_some(),
            Storable::Group(group) => group.has_all_cards(),
        }
    }

    /// Does no card under this node hold an item?
    #[must_use]
    pub fn has_all_cards_empty(&self) -> bool {
        match self {
            Storable::Slot(slot) => slot.card().map_or(true, |card| !card.has_item()),
            Storable::Group(group) => group.has_all_cards_empty(),
        }
    }

    /// Does every card under this node hold an item?
    #[must_use]
    pub fn has_all_cards_full(&self) -> bool {
        match self {
            Storable::Slot(slot) => slot.card().is_some_and(InventoryStorable::has_item),
            Storable::Group(group) => group.has_all_cards_full(),
        }
    }

    /// Total items held by cards under this node.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cards().filter(|card| card.has_item()).count()
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        match self {
            Storable::Slot(slot) => slot.contains(card),
            Storable::Group(group) => group.contains(card),
        }
    }

    #[must_use]
    pub fn can_fetch(&self, card: CardId) -> bool {
        match self {
            Storable::Slot(slot) => slot.contains(card),
            Storable::Group(group) => group.can_fetch(card),
        }
    }

    /// Depth-first iterator over every card under this node.
    #[must_use]
    pub fn cards(&self) -> Cards<'_> {
        Cards::new(self)
    }

    /// Look up a node by ID anywhere in this subtree.
    #[must_use]
    pub fn find(&self, id: StorableId) -> Option<&Storable> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Storable::Slot(_) => None,
            Storable::Group(group) => group.children().iter().find_map(|child| child.find(id)),
        }
    }

    /// Textures stacked onto `card`'s face by every ruleset above it.
    #[must_use]
    pub fn card_textures(&self, card: CardId) -> Vec<TextureId> {
        match self {
            Storable::Slot(_) => Vec::new(),
            Storable::Group(group) => group.card_textures(card),
        }
    }

    /// Resting position of every card under this node.
    #[must_use]
    pub fn layout_targets(&self, origin: Vec3) -> Vec<(CardId, Vec3)> {
        let mut targets = Vec::new();
        self.layout_into(origin, &mut targets);
        targets
    }

    pub(crate) fn layout_into(&self, origin: Vec3, out: &mut Vec<(CardId, Vec3)>) {
        match self {
            Storable::Slot(slot) => {
                if let Some(card) = slot.card() {
                    out.push((card.id(), origin));
                }
            }
            Storable::Group(group) => group.layout_into(origin, out),
        }
    }

    // === Operations ===

    /// Store an item somewhere under this node.
    pub fn store(&mut self, item: Item) -> Result<StoreResult> {
        match self {
            Storable::Slot(slot) => slot.store(item),
            Storable::Group(group) => group.store(item),
        }
    }

    /// Remove and return the item held by `card`.
    ///
    /// Fails if `card` is not under this node or may not be fetched.
    pub fn fetch(&mut self, card: CardId) -> Result<Option<Item>> {
        match self {
            Storable::Slot(slot) => slot.fetch(card),
            Storable::Group(group) => group.fetch(card),
        }
    }

    /// Drain `cards` into free capacity. Consumed cards are removed from the
    /// front of the list.
    pub fn flush(&mut self, cards: &mut Vec<InventoryStorable>) {
        match self {
            Storable::Slot(slot) => slot.flush(cards),
            Storable::Group(group) => group.flush(cards),
        }
    }

    /// Populate from `cards` without consulting rulesets for placement.
    pub fn load(&mut self, cards: &mut Vec<InventoryStorable>) {
        match self {
            Storable::Slot(slot) => slot.flush(cards),
            Storable::Group(group) => group.load(cards),
        }
    }

    /// Drain every card under this node into `cards`, dismantling the node.
    pub fn save(&mut self, cards: &mut Vec<InventoryStorable>) {
        match self {
            Storable::Slot(slot) => slot.save(cards),
            Storable::Group(group) => group.save(cards),
        }
    }

    /// Reveal the card on whichever memory board holds it.
    pub fn flip(&mut self, card: CardId) -> Result<FlipOutcome> {
        match self {
            Storable::Slot(slot) => slot.flip(card),
            Storable::Group(group) => group.flip(card),
        }
    }

    /// Pull a specific card out of the tree, leaving its slot empty.
    ///
    /// Bypasses rulesets; used when a card's visual leaves the deque.
    pub fn take_card(&mut self, card: CardId) -> Option<InventoryStorable> {
        match self {
            Storable::Slot(slot) => slot.take_card(card),
            Storable::Group(group) => group.take_card(card),
        }
    }

    /// Advance time-driven state for every group in this subtree.
    pub fn tick(&mut self, delta_time: f32) {
        if let Storable::Group(group) = self {
            group.tick(delta_time);
        }
    }
}

impl<'a> IntoIterator for &'a Storable {
    type Item = &'a InventoryStorable;
    type IntoIter = Cards<'a>;

    fn into_iter(self) -> Cards<'a> {
        self.cards()
    }
}

pub(crate) fn log_drain(kind: &str, id: StorableId, before: usize, after: usize) {
    if before != after {
        debug!(%id, consumed = before - after, remaining = after, "{kind} drained cards");
    }
}
