//! Layout areas and the providers that send cards to them.
//!
//! A `LayoutArea` is a staging surface with its own storage tree. Cards
//! placed there get a permanent `CardTarget` they keep until they leave.
//! A `LayoutAdder` is the destination provider a card carries: it holds the
//! owner's pending hand of cards that should follow it into the area.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::config::StorableGroupDefinition;
use crate::core::entity::CardId;
use crate::core::error::Result;
use crate::core::geometry::Vec3;
use crate::items::InventoryStorable;
use crate::storage::Storable;

use super::target::CardTarget;

/// A staging surface with its own inventory.
#[derive(Debug)]
pub struct LayoutArea {
    name: String,
    origin: Vec3,
    inventory: Storable,
    targets: FxHashMap<CardId, CardTarget>,
    active_layouts: Vec<String>,
}

impl LayoutArea {
    /// Create an area whose inventory follows `definition`.
    pub fn new(name: impl Into<String>, origin: Vec3, definition: StorableGroupDefinition) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            origin,
            inventory: Storable::group(definition)?,
            targets: FxHashMap::default(),
            active_layouts: Vec::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn inventory(&self) -> &Storable {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Storable {
        &mut self.inventory
    }

    /// Open a temporary layout group on top of the area.
    pub fn push_layout(&mut self, name: impl Into<String>) {
        self.active_layouts.push(name.into());
    }

    #[must_use]
    pub fn active_layouts(&self) -> &[String] {
        &self.active_layouts
    }

    /// Collapse every active layout group. Returns how many were open.
    pub fn pop_all_layouts(&mut self) -> usize {
        let collapsed = self.active_layouts.len();
        self.active_layouts.clear();
        if collapsed > 0 {
            debug!(area = %self.name, collapsed, "layouts collapsed");
        }
        collapsed
    }

    #[must_use]
    pub fn target(&self, card: CardId) -> Option<&CardTarget> {
        self.targets.get(&card)
    }

    /// The card's permanent target, created at its laid-out position if new.
    pub fn add_permanent_target_and_card(&mut self, card: CardId) -> CardTarget {
        if let Some(target) = self.targets.get(&card) {
            return target.clone();
        }
        let position = self
            .inventory
            .layout_targets(self.origin)
            .into_iter()
            .find_map(|(laid_out, position)| (laid_out == card).then_some(position))
            .unwrap_or(self.origin);
        let target = CardTarget::new(format!("{}/{}", self.name, card), position);
        self.targets.insert(card, target.clone());
        target
    }

    pub fn remove_target(&mut self, card: CardId) -> Option<CardTarget> {
        self.targets.remove(&card)
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.inventory.tick(delta_time);
    }
}

/// Destination provider carried by a card headed for a layout area.
///
/// The card it speaks for is the one its state machine drives.
#[derive(Debug, Default)]
pub struct LayoutAdder {
    hand: Vec<InventoryStorable>,
}

impl LayoutAdder {
    pub fn new(hand: Vec<InventoryStorable>) -> Self {
        Self { hand }
    }

    /// Cards waiting to follow this one into the area.
    #[must_use]
    pub fn hand(&self) -> &[InventoryStorable] {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Vec<InventoryStorable> {
        &mut self.hand
    }
}
