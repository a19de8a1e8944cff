//! Ruleset policies for storable groups.
//!
//! A group never decides ordering, eligibility or layout on its own. It asks
//! its ruleset. Rulesets come in two layers:
//!
//! - [`Ruleset`]: the policy. Stateless; every decision receives the group's
//!   children and the policy's own state by reference, so a policy can be
//!   exercised in isolation with a hand-built state.
//! - [`GroupRuleset`]: what a group actually holds. A policy paired with the
//!   state it owns, type-erased so groups with different policies can nest.
//!
//! Games pick a policy per group through [`RulesetKind`] in the group's
//! definition; [`build`] turns that into a live `GroupRuleset`.
//!
//! ## Example
//!
//! ```
//! use capturellection::core::ArraySettings;
//! use capturellection::rulesets::{ArrayRuleset, ArrayState, Ruleset};
//!
//! let ruleset = ArrayRuleset::new(ArraySettings::default());
//! let mut state = ruleset.new_state();
//! ruleset.tick(&[], &mut state, 0.5);
//! assert_eq!(state.time, 0.5);
//! ```

mod array;
mod memory;

pub use array::{ArrayRuleset, ArrayState};
pub use memory::{FlipTracker, MemoryRuleset, MemoryState};

use std::any::Any;
use std::fmt;

use crate::core::config::RulesetKind;
use crate::core::entity::{CardId, TextureId};
use crate::core::geometry::Vec3;
use crate::storage::{FlipOutcome, Storable};

/// Placement, ordering and eligibility policy for a group.
///
/// Index-returning methods may return any value; the group clamps it to the
/// valid insertion range.
pub trait Ruleset: fmt::Debug {
    /// Per-group mutable data owned alongside this policy.
    type State: fmt::Debug;

    /// Create the state for a freshly built group.
    fn new_state(&self) -> Self::State;

    /// Bounding extent of the laid-out children.
    fn max_possible_size_of(&self, children: &[Storable], state: &Self::State) -> Vec3;

    /// Which child receives a newly stored item.
    fn index_to_store_into(&self, children: &[Storable], state: &Self::State) -> usize;

    /// Where a child goes back after an item was stored into it.
    ///
    /// `children` no longer contains `moved`.
    fn index_to_insert_after_store(
        &self,
        children: &[Storable],
        state: &Self::State,
        moved: &Storable,
        original_index: usize,
    ) -> usize;

    /// Where a child goes back after an item was fetched from it.
    ///
    /// `children` no longer contains `moved`.
    fn index_to_insert_after_fetch(
        &self,
        children: &[Storable],
        state: &Self::State,
        moved: &Storable,
        original_index: usize,
    ) -> usize;

    /// Where a child synthesized by a flush is inserted.
    fn index_to_flush_between(&self, children: &[Storable], state: &Self::State, new_child: &Storable) -> usize;

    /// Whether `card` may leave the group right now.
    fn can_fetch_from(&self, children: &[Storable], state: &Self::State, card: CardId) -> bool;

    /// Textures this layer adds to the faces of its cards.
    fn card_textures(&self) -> Vec<TextureId>;

    /// Advance time-driven state.
    fn tick(&self, children: &[Storable], state: &mut Self::State, delta_time: f32);

    /// Offset of each child from the group origin, in child order.
    fn layout(&self, children: &[Storable], state: &Self::State) -> Vec<Vec3>;

    // === Hooks ===

    /// Runs before `index_to_store_into`; may reorder children.
    fn before_store(&self, _children: &mut [Storable], _state: &mut Self::State) {}

    /// Runs once a fetch has been authorized, before the child is touched.
    fn before_fetch(&self, _children: &[Storable], _state: &mut Self::State, _card: CardId) {}

    /// Reveal the storable holding `card`.
    fn flip(&self, _children: &[Storable], _state: &mut Self::State, _card: CardId) -> FlipOutcome {
        FlipOutcome::NotFlippable
    }

    /// How many storables the load and flush hooks turn each new storable into.
    ///
    /// A group only grows while this many more children still fit.
    fn storables_per_created(&self) -> usize {
        1
    }

    /// Transform a storable created by `load` into the storables actually kept.
    fn load_storable_hook(&self, _state: &mut Self::State, storable: Storable) -> Vec<Storable> {
        vec![storable]
    }

    /// Transform a storable grown by `flush` into the storables actually kept.
    fn flush_storable_hook(&self, _state: &mut Self::State, storable: Storable) -> Vec<Storable> {
        vec![storable]
    }

    /// Transform a storable drained by `save` into the storables whose cards
    /// are handed back to the caller.
    fn save_storable_hook(&self, _state: &mut Self::State, storable: Storable) -> Vec<Storable> {
        vec![storable]
    }
}

/// A ruleset bound to its state, as held by a group.
///
/// Mirrors [`Ruleset`] without the state parameter.
pub trait GroupRuleset: fmt::Debug {
    fn max_possible_size_of(&self, children: &[Storable]) -> Vec3;
    fn before_store(&mut self, children: &mut [Storable]);
    fn index_to_store_into(&self, children: &[Storable]) -> usize;
    fn index_to_insert_after_store(&self, children: &[Storable], moved: &Storable, original_index: usize) -> usize;
    fn index_to_insert_after_fetch(&self, children: &[Storable], moved: &Storable, original_index: usize) -> usize;
    fn index_to_flush_between(&self, children: &[Storable], new_child: &Storable) -> usize;
    fn can_fetch_from(&self, children: &[Storable], card: CardId) -> bool;
    fn before_fetch(&mut self, children: &[Storable], card: CardId);
    fn flip(&mut self, children: &[Storable], card: CardId) -> FlipOutcome;
    fn card_textures(&self) -> Vec<TextureId>;
    fn tick(&mut self, children: &[Storable], delta_time: f32);
    fn layout(&self, children: &[Storable]) -> Vec<Vec3>;
    fn storables_per_created(&self) -> usize;
    fn load_storable_hook(&mut self, storable: Storable) -> Vec<Storable>;
    fn flush_storable_hook(&mut self, storable: Storable) -> Vec<Storable>;
    fn save_storable_hook(&mut self, storable: Storable) -> Vec<Storable>;

    /// The state, for inspection by callers that know its concrete type.
    fn state_any(&self) -> &dyn Any;
}

/// A policy together with the state it owns.
#[derive(Debug)]
pub struct Governed<R: Ruleset> {
    ruleset: R,
    state: R::State,
}

impl<R: Ruleset> Governed<R> {
    pub fn new(ruleset: R) -> Self {
        let state = ruleset.new_state();
        Self { ruleset, state }
    }

    pub fn ruleset(&self) -> &R {
        &self.ruleset
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }
}

impl<R> GroupRuleset for Governed<R>
where
    R: Ruleset + 'static,
    R::State: 'static,
{
    fn max_possible_size_of(&self, children: &[Storable]) -> Vec3 {
        self.ruleset.max_possible_size_of(children, &self.state)
    }

    fn before_store(&mut self, children: &mut [Storable]) {
        self.ruleset.before_store(children, &mut self.state);
    }

    fn index_to_store_into(&self, children: &[Storable]) -> usize {
        self.ruleset.index_to_store_into(children, &self.state)
    }

    fn index_to_insert_after_store(&self, children: &[Storable], moved: &Storable, original_index: usize) -> usize {
        self.ruleset
            .index_to_insert_after_store(children, &self.state, moved, original_index)
    }

    fn index_to_insert_after_fetch(&self, children: &[Storable], moved: &Storable, original_index: usize) -> usize {
        self.ruleset
            .index_to_insert_after_fetch(children, &self.state, moved, original_index)
    }

    fn index_to_flush_between(&self, children: &[Storable], new_child: &Storable) -> usize {
        self.ruleset.index_to_flush_between(children, &self.state, new_child)
    }

    fn can_fetch_from(&self, children: &[Storable], card: CardId) -> bool {
        self.ruleset.can_fetch_from(children, &self.state, card)
    }

    fn before_fetch(&mut self, children: &[Storable], card: CardId) {
        self.ruleset.before_fetch(children, &mut self.state, card);
    }

    fn flip(&mut self, children: &[Storable], card: CardId) -> FlipOutcome {
        self.ruleset.flip(children, &mut self.state, card)
    }

    fn card_textures(&self) -> Vec<TextureId> {
        self.ruleset.card_textures()
    }

    fn tick(&mut self, children: &[Storable], delta_time: f32) {
        self.ruleset.tick(children, &mut self.state, delta_time);
    }

    fn layout(&self, children: &[Storable]) -> Vec<Vec3> {
        self.ruleset.layout(children, &self.state)
    }

    fn storables_per_created(&self) -> usize {
        self.ruleset.storables_per_created()
    }

    fn load_storable_hook(&mut self, storable: Storable) -> Vec<Storable> {
        self.ruleset.load_storable_hook(&mut self.state, storable)
    }

    fn flush_storable_hook(&mut self, storable: Storable) -> Vec<Storable> {
        self.ruleset.flush_storable_hook(&mut self.state, storable)
    }

    fn save_storable_hook(&mut self, storable: Storable) -> Vec<Storable> {
        self.ruleset.save_storable_hook(&mut self.state, storable)
    }

    fn state_any(&self) -> &dyn Any {
        &self.state
    }
}

/// Build the live ruleset a definition asks for.
pub fn build(kind: &RulesetKind) -> Box<dyn GroupRuleset> {
    match kind {
        RulesetKind::Array(settings) => Box::new(Governed::new(ArrayRuleset::new(settings.clone()))),
        RulesetKind::Memory(settings) => Box::new(Governed::new(MemoryRuleset::new(settings.clone()))),
    }
}

/// Index of the first child matching `predicate`, else `fallback`.
pub(crate) fn first_index_where(
    children: &[Storable],
    predicate: impl Fn(&Storable) -> bool,
    fallback: usize,
) -> usize {
    children.iter().position(predicate).unwrap_or(fallback)
}

/// Largest extent among `children`.
pub(crate) fn largest_child(children: &[Storable]) -> Vec3 {
    children
        .iter()
        .map(Storable::max_possible_size)
        .fold(Vec3::ZERO, Vec3::max)
}
