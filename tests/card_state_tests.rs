//! Card positional state machine integration tests.
//!
//! A card moves between a deque and a layout area; the machine keeps the
//! area's inventory and targets in step with the card's state.

use capturellection::core::{StorableDefinition, StorableGroupDefinition, StorageError, Vec3};
use capturellection::items::InventoryStorable;
use capturellection::layout::{CardEvent, CardState, CardTarget, DequeElementStateMachine, LayoutAdder, LayoutArea};

fn table() -> LayoutArea {
    LayoutArea::new(
        "table",
        Vec3::new(0.0, 1.0, 0.0),
        StorableGroupDefinition::new("table", 4, StorableDefinition::slot()),
    )
    .unwrap()
}

fn machine_with_hand(hand_size: usize) -> (DequeElementStateMachine, Vec<capturellection::core::CardId>) {
    let hand: Vec<InventoryStorable> = (0..hand_size).map(|_| InventoryStorable::new()).collect();
    let ids = hand.iter().map(InventoryStorable::id).collect::<Vec<_>>();
    let machine = DequeElementStateMachine::new(ids[0], CardTarget::new("deque/0", Vec3::ZERO))
        .with_layout_adder(LayoutAdder::new(hand));
    (machine, ids)
}

// =============================================================================
// Transitions
// =============================================================================

/// Test that entering the area flushes the hand and assigns a target.
#[test]
fn test_enter_layout_area() {
    let mut area = table();
    let (mut machine, ids) = machine_with_hand(3);

    let state = machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
    assert_eq!(state, CardState::InLayoutArea);

    for id in &ids {
        assert!(area.inventory().contains(*id));
    }
    let target = area.target(ids[0]).unwrap();
    assert_eq!(machine.animator().target(), Some(target));
}

/// Test that entering collapses open layouts.
#[test]
fn test_enter_collapses_layouts() {
    let mut area = table();
    area.push_layout("fan");
    let (mut machine, _) = machine_with_hand(1);

    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
    assert!(area.active_layouts().is_empty());
}

/// Test that the card reaches its target after enough ticks.
#[test]
fn test_animation_arrives() {
    let mut area = table();
    let (mut machine, ids) = machine_with_hand(1);
    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();

    let destination = area.target(ids[0]).unwrap().position;
    let mut arrived = false;
    for _ in 0..100 {
        if machine.tick(0.1) {
            arrived = true;
            break;
        }
    }
    assert!(arrived);
    assert!(machine.position().approx_eq(destination, 1e-4));
    assert!(!machine.animator().is_moving());
}

/// Test that returning removes the card and its target from the area.
#[test]
fn test_return_to_deque() {
    let mut area = table();
    let (mut machine, ids) = machine_with_hand(2);
    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();

    let state = machine.fire(CardEvent::ReturnToDeque, &mut area).unwrap();
    assert_eq!(state, CardState::InDeque);
    assert!(!area.inventory().contains(ids[0]));
    assert!(area.inventory().contains(ids[1]));
    assert!(area.target(ids[0]).is_none());
    assert_eq!(machine.layout_adder().unwrap().hand().len(), 1);
    assert_eq!(machine.animator().target().map(|target| target.name.as_str()), Some("deque/0"));
}

/// Test that the permanent target belongs to the machine's own card even when
/// it is not first in the hand, and is gone after returning.
#[test]
fn test_target_follows_machine_card() {
    let mut area = table();
    let follower = InventoryStorable::new();
    let own = InventoryStorable::new();
    let (follower_id, own_id) = (follower.id(), own.id());
    let mut machine = DequeElementStateMachine::new(own_id, CardTarget::new("deque/1", Vec3::ZERO))
        .with_layout_adder(LayoutAdder::new(vec![follower, own]));

    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
    assert!(area.target(own_id).is_some());
    assert!(area.target(follower_id).is_none());

    machine.fire(CardEvent::ReturnToDeque, &mut area).unwrap();
    assert!(area.target(own_id).is_none());
    assert!(!area.inventory().contains(own_id));
    assert!(area.inventory().contains(follower_id));
}

/// Test that re-entering reuses the area's free slot.
#[test]
fn test_reenter_after_return() {
    let mut area = table();
    let (mut machine, ids) = machine_with_hand(1);

    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
    machine.fire(CardEvent::ReturnToDeque, &mut area).unwrap();
    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();

    assert_eq!(machine.state(), CardState::InLayoutArea);
    assert!(area.inventory().contains(ids[0]));
    assert_eq!(area.inventory().cards().count(), 1);
}

// =============================================================================
// Errors and ignored events
// =============================================================================

/// Test that entering without a layout adder fails and keeps the state.
#[test]
fn test_enter_without_adder() {
    let mut area = table();
    let card = InventoryStorable::new().id();
    let mut machine = DequeElementStateMachine::new(card, CardTarget::new("deque/0", Vec3::ZERO));

    let result = machine.fire(CardEvent::EnterLayoutArea, &mut area);
    assert_eq!(result, Err(StorageError::MissingLayoutAdder(card)));
    assert_eq!(machine.state(), CardState::InDeque);
}

/// Test that repeating an event in its target state is ignored.
#[test]
fn test_repeated_enter_is_ignored() {
    let mut area = table();
    let (mut machine, _) = machine_with_hand(2);

    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();
    let count = area.inventory().cards().count();
    machine.fire(CardEvent::EnterLayoutArea, &mut area).unwrap();

    assert_eq!(machine.state(), CardState::InLayoutArea);
    assert_eq!(area.inventory().cards().count(), count);
}
