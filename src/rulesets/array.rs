//! Array layout: a single wobbling row.
//!
//! Children are laid out left to right, `card_distance` apart and centred
//! on the group origin. Each child bobs vertically on a sine wave phase
//! shifted by `wobble_time_offset` per index. Storage is plain: store into
//! the first child with room, else the first child; never reorder. Flushed
//! storables go in front of the first child holding no items, else last.

use tracing::trace;

use crate::core::config::ArraySettings;
use crate::core::entity::{CardId, TextureId};
use crate::core::geometry::Vec3;
use crate::storage::Storable;

use super::{first_index_where, largest_child, Ruleset};

/// Array layout policy.
#[derive(Clone, Debug)]
pub struct ArrayRuleset {
    settings: ArraySettings,
}

/// Time accumulated by ticks; drives the wobble.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayState {
    pub time: f32,
}

impl ArrayRuleset {
    pub fn new(settings: ArraySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ArraySettings {
        &self.settings
    }

    fn wobble(&self, state: &ArrayState, index: usize) -> f32 {
        (state.time + index as f32 * self.settings.wobble_time_offset).sin() * self.settings.wobble_height
    }
}

impl Ruleset for ArrayRuleset {
    type State = ArrayState;

    fn new_state(&self) -> ArrayState {
        ArrayState::default()
    }

    fn max_possible_size_of(&self, children: &[Storable], _state: &ArrayState) -> Vec3 {
        if children.is_empty() {
            return Vec3::ZERO;
        }
        let largest = largest_child(children);
        let span = self.settings.card_distance * (children.len() - 1) as f32;
        Vec3::new(
            span + largest.x,
            largest.y + 2.0 * self.settings.wobble_height,
            largest.z,
        )
    }

    fn index_to_store_into(&self, children: &[Storable], _state: &ArrayState) -> usize {
        first_index_where(children, |child| !child.has_no_cards() && !child.has_all_cards_full(), 0)
    }

    fn index_to_insert_after_store(
        &self,
        _children: &[Storable],
        _state: &ArrayState,
        _moved: &Storable,
        original_index: usize,
    ) -> usize {
        original_index
    }

    fn index_to_insert_after_fetch(
        &self,
        _children: &[Storable],
        _state: &ArrayState,
        _moved: &Storable,
        original_index: usize,
    ) -> usize {
        original_index
    }

    fn index_to_flush_between(&self, children: &[Storable], _state: &ArrayState, _new_child: &Storable) -> usize {
        first_index_where(children, Storable::has_all_cards_empty, children.len())
    }

    fn can_fetch_from(&self, children: &[Storable], _state: &ArrayState, card: CardId) -> bool {
        children
            .iter()
            .find(|child| child.contains(card))
            .is_some_and(|child| child.can_fetch(card))
    }

    fn card_textures(&self) -> Vec<TextureId> {
        self.settings.textures.clone()
    }

    fn tick(&self, _children: &[Storable], state: &mut ArrayState, delta_time: f32) {
        state.time += delta_time;
        trace!(time = state.time, "array ruleset ticked");
    }

    fn layout(&self, children: &[Storable], state: &ArrayState) -> Vec<Vec3> {
        let count = children.len();
        let mut right = Vec3::RIGHT * (-self.settings.card_distance * count.saturating_sub(1) as f32 / 2.0);
        let mut offsets = Vec::with_capacity(count);
        for index in 0..count {
            offsets.push(right + Vec3::UP * self.wobble(state, index));
            right += Vec3::RIGHT * self.settings.card_distance;
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorableDefinition;
    use crate::items::{InventoryStorable, Item};
    use crate::core::entity::ItemId;

    fn slot_with(card: Option<InventoryStorable>) -> Storable {
        let mut slot = Storable::from_definition(&StorableDefinition::slot());
        if let Some(card) = card {
            slot.load(&mut vec![card]);
        }
        slot
    }

    #[test]
    fn test_store_prefers_first_empty() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        let state = ruleset.new_state();

        let full = InventoryStorable::with_item(Item::new(ItemId::new(1), "full"));
        let children = vec![slot_with(Some(full)), slot_with(Some(InventoryStorable::new()))];

        assert_eq!(ruleset.index_to_store_into(&children, &state), 1);
    }

    #[test]
    fn test_store_falls_back_to_first() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        let state = ruleset.new_state();

        let a = InventoryStorable::with_item(Item::new(ItemId::new(1), "a"));
        let b = InventoryStorable::with_item(Item::new(ItemId::new(2), "b"));
        let children = vec![slot_with(Some(a)), slot_with(Some(b))];

        assert_eq!(ruleset.index_to_store_into(&children, &state), 0);
    }

    #[test]
    fn test_flush_inserts_before_first_empty_child() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        let state = ruleset.new_state();

        let full = InventoryStorable::with_item(Item::new(ItemId::new(1), "full"));
        let children = vec![slot_with(Some(full)), slot_with(Some(InventoryStorable::new()))];
        let new_child = slot_with(Some(InventoryStorable::new()));

        assert_eq!(ruleset.index_to_flush_between(&children, &state, &new_child), 1);
    }

    #[test]
    fn test_flush_appends_when_every_child_holds_items() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        let state = ruleset.new_state();

        let a = InventoryStorable::with_item(Item::new(ItemId::new(1), "a"));
        let b = InventoryStorable::with_item(Item::new(ItemId::new(2), "b"));
        let children = vec![slot_with(Some(a)), slot_with(Some(b))];
        let new_child = slot_with(Some(InventoryStorable::new()));

        assert_eq!(ruleset.index_to_flush_between(&children, &state, &new_child), 2);
    }

    #[test]
    fn test_layout_is_centred_without_wobble() {
        let ruleset = ArrayRuleset::new(ArraySettings {
            card_distance: 1.0,
            wobble_height: 0.0,
            ..ArraySettings::default()
        });
        let state = ruleset.new_state();
        let children: Vec<_> = (0..3).map(|_| slot_with(None)).collect();

        let offsets = ruleset.layout(&children, &state);
        assert_eq!(offsets, vec![
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]);
    }

    #[test]
    fn test_wobble_is_phase_shifted() {
        let ruleset = ArrayRuleset::new(ArraySettings {
            card_distance: 1.0,
            wobble_height: 1.0,
            wobble_time_offset: std::f32::consts::FRAC_PI_2,
            textures: Vec::new(),
        });
        let state = ArrayState { time: 0.0 };
        let children: Vec<_> = (0..2).map(|_| slot_with(None)).collect();

        let offsets = ruleset.layout(&children, &state);
        assert!(offsets[0].y.abs() < 1e-6);
        assert!((offsets[1].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tick_accumulates_time() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        let mut state = ruleset.new_state();
        ruleset.tick(&[], &mut state, 0.25);
        ruleset.tick(&[], &mut state, 0.25);
        assert_eq!(state.time, 0.5);
    }

    #[test]
    fn test_empty_size_is_zero() {
        let ruleset = ArrayRuleset::new(ArraySettings::default());
        assert_eq!(ruleset.max_possible_size_of(&[], &ruleset.new_state()), Vec3::ZERO);
    }
}
