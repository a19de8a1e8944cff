//! Per-card positional state machine.
//!
//! Each stored card's visual is either resting in its deque slot or placed
//! in a layout area. Presentation code pushes events in; the machine updates
//! the storage trees to match and starts the animation, then returns without
//! waiting for it.

use tracing::{debug, warn};

use crate::core::entity::CardId;
use crate::core::error::{Result, StorageError};
use crate::core::geometry::Vec3;

use super::animator::CardAnimator;
use super::area::{LayoutAdder, LayoutArea};
use super::target::CardTarget;

/// Where a card's visual currently belongs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardState {
    #[default]
    InDeque,
    InLayoutArea,
}

/// Transition triggers delivered by presentation code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEvent {
    EnterLayoutArea,
    ReturnToDeque,
}

/// Drives one card between its deque slot and a layout area.
///
/// Collaborators are handed in explicitly: the deque target at construction,
/// the destination provider through [`with_layout_adder`](Self::with_layout_adder),
/// and the area itself with each event.
#[derive(Debug)]
pub struct DequeElementStateMachine {
    card: CardId,
    state: CardState,
    deque_target: CardTarget,
    layout_adder: Option<LayoutAdder>,
    animator: CardAnimator,
}

impl DequeElementStateMachine {
    /// Default animation speed, in units per second.
    pub const DEFAULT_SPEED: f32 = 2.0;

    /// A card resting at its deque slot.
    pub fn new(card: CardId, deque_target: CardTarget) -> Self {
        let animator = CardAnimator::new(deque_target.position, Self::DEFAULT_SPEED);
        Self {
            card,
            state: CardState::InDeque,
            deque_target,
            layout_adder: None,
            animator,
        }
    }

    /// Attach the destination provider used when entering a layout area.
    #[must_use]
    pub fn with_layout_adder(mut self, adder: LayoutAdder) -> Self {
        self.layout_adder = Some(adder);
        self
    }

    pub fn set_layout_adder(&mut self, adder: Option<LayoutAdder>) {
        self.layout_adder = adder;
    }

    #[must_use]
    pub fn card(&self) -> CardId {
        self.card
    }

    #[must_use]
    pub fn state(&self) -> CardState {
        self.state
    }

    #[must_use]
    pub fn layout_adder(&self) -> Option<&LayoutAdder> {
        self.layout_adder.as_ref()
    }

    #[must_use]
    pub fn animator(&self) -> &CardAnimator {
        &self.animator
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.animator.position()
    }

    /// Deliver an event. Repeating the current state's event does nothing.
    pub fn fire(&mut self, event: CardEvent, area: &mut LayoutArea) -> Result<CardState> {
        match (self.state, event) {
            (CardState::InDeque, CardEvent::EnterLayoutArea) => self.enter_layout_area(area)?,
            (CardState::InLayoutArea, CardEvent::ReturnToDeque) => self.return_to_deque(area),
            _ => debug!(card = %self.card, state = ?self.state, ?event, "event ignored"),
        }
        Ok(self.state)
    }

    /// Advance the card's animation.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.animator.tick(delta_time)
    }

    fn enter_layout_area(&mut self, area: &mut LayoutArea) -> Result<()> {
        let Some(adder) = self.layout_adder.as_mut() else {
            warn!(card = %self.card, "layout area entered without a layout adder");
            return Err(StorageError::MissingLayoutAdder(self.card));
        };

        area.pop_all_layouts();
        area.inventory_mut().flush(adder.hand_mut());
        let target = area.add_permanent_target_and_card(self.card);
        self.animator.move_to(&target);

        self.state = CardState::InLayoutArea;
        debug!(card = %self.card, area = %area.name(), target = %target.name, "entered layout area");
        Ok(())
    }

    fn return_to_deque(&mut self, area: &mut LayoutArea) {
        area.remove_target(self.card);
        if let Some(card) = area.inventory_mut().take_card(self.card) {
            if let Some(adder) = self.layout_adder.as_mut() {
                adder.hand_mut().push(card);
            }
        }
        self.animator.move_to(&self.deque_target);

        self.state = CardState::InDeque;
        debug!(card = %self.card, area = %area.name(), "returned to deque");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{StorableDefinition, StorableGroupDefinition};
    use crate::items::InventoryStorable;

    fn area() -> LayoutArea {
        LayoutArea::new(
            "table",
            Vec3::new(1.0, 0.0, 0.0),
            StorableGroupDefinition::new("table", 2, StorableDefinition::slot()),
        )
        .unwrap()
    }

    #[test]
    fn test_enter_without_adder_fails() {
        let card = CardId::fresh();
        let mut machine = DequeElementStateMachine::new(card, CardTarget::new("slot", Vec3::ZERO));
        let result = machine.fire(CardEvent::EnterLayoutArea, &mut area());
        assert_eq!(result, Err(StorageError::MissingLayoutAdder(card)));
        assert_eq!(machine.state(), CardState::InDeque);
    }

    #[test]
    fn test_repeated_event_is_ignored() {
        let card = CardId::fresh();
        let mut machine = DequeElementStateMachine::new(card, CardTarget::new("slot", Vec3::ZERO));
        let state = machine.fire(CardEvent::ReturnToDeque, &mut area()).unwrap();
        assert_eq!(state, CardState::InDeque);
        assert!(!machine.animator().is_moving());
    }

    #[test]
    fn test_round_trip_moves_card_between_trees() {
        let card = InventoryStorable::new();
        let id = card.id();
        let mut area = area();
        let mut machine = DequeElementStateMachine::new(id, CardTarget::new("slot", Vec3::ZERO))
            .with_layout_adder(LayoutAdder::new(vec![card]));

        machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
        assert_eq!(machine.state(), CardState::InLayoutArea);
        assert!(area.inventory().contains(id));
        assert!(machine.layout_adder().unwrap().hand().is_empty());
        assert!(machine.animator().is_moving());

        machine.fire(CardEvent::ReturnToDeque, &mut area).unwrap();
        assert_eq!(machine.state(), CardState::InDeque);
        assert!(!area.inventory().contains(id));
        assert!(area.target(id).is_none());
        assert_eq!(machine.layout_adder().unwrap().hand().len(), 1);
    }
}
