//! Memory layout: a pairs-matching board.
//!
//! Every storable loaded or flushed into a memory group is duplicated into two proxy
//! storables whose proxy cards share the original cards' containers, and the
//! two proxies are registered as a pair. Cards start face down. A card can
//! only be fetched once its storable and that storable's pair are both face
//! up, or once its storable holds nothing at all.
//!
//! ## Flip protocol
//!
//! - Flipping a face-up storable answers whether it is matched; it never
//!   changes state.
//! - Flipping a face-down storable while two are already face up turns those
//!   two back down first.
//! - At most two storables are face up at a time.
//! - Flipping alone never authorizes a fetch.
//!
//! Stores shuffle the board first, so a slot's position says nothing about
//! its pair.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::config::MemorySettings;
use crate::core::entity::{CardId, StorableId, TextureId};
use crate::core::geometry::Vec3;
use crate::core::rng::DequeRng;
use crate::items::InventoryStorable;
use crate::storage::{FlipOutcome, Storable};

use super::{first_index_where, largest_child, Ruleset};

/// Face state of one memory card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlipTracker {
    face_up: bool,
}

impl FlipTracker {
    /// A card lying face down.
    #[must_use]
    pub fn face_down() -> Self {
        Self::default()
    }

    /// Turn the card face up or down.
    pub fn flip(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }
}

/// Bookkeeping for one memory board.
#[derive(Debug)]
pub struct MemoryState {
    /// Symmetric pairing between proxy storables.
    pairs: FxHashMap<StorableId, StorableId>,

    /// Face-up storables, oldest first. Never more than two.
    flipped: SmallVec<[StorableId; 2]>,

    /// Face state of every proxy card.
    flip_trackers: FxHashMap<CardId, FlipTracker>,

    /// Proxy storable -> the storable it was duplicated from.
    originals: FxHashMap<StorableId, StorableId>,

    /// Storables replaced by proxies, held until the board is saved.
    original_storables: FxHashMap<StorableId, Storable>,

    rng: DequeRng,
}

impl MemoryState {
    pub fn new(seed: u64) -> Self {
        Self {
            pairs: FxHashMap::default(),
            flipped: SmallVec::new(),
            flip_trackers: FxHashMap::default(),
            originals: FxHashMap::default(),
            original_storables: FxHashMap::default(),
            rng: DequeRng::new(seed),
        }
    }

    /// The storable paired with `storable`, if any.
    #[must_use]
    pub fn pair_of(&self, storable: StorableId) -> Option<StorableId> {
        self.pairs.get(&storable).copied()
    }

    /// Iterate over every `(storable, pair)` entry.
    pub fn pairs(&self) -> impl Iterator<Item = (StorableId, StorableId)> + '_ {
        self.pairs.iter().map(|(&a, &b)| (a, b))
    }

    /// Face-up storables, oldest first.
    #[must_use]
    pub fn flipped(&self) -> &[StorableId] {
        &self.flipped
    }

    #[must_use]
    pub fn is_flipped(&self, storable: StorableId) -> bool {
        self.flipped.contains(&storable)
    }

    /// Is `storable` face up together with its pair?
    #[must_use]
    pub fn is_matched(&self, storable: StorableId) -> bool {
        self.is_flipped(storable)
            && self
                .pair_of(storable)
                .is_some_and(|pair| self.is_flipped(pair))
    }

    #[must_use]
    pub fn flip_tracker(&self, card: CardId) -> Option<&FlipTracker> {
        self.flip_trackers.get(&card)
    }

    #[must_use]
    pub fn is_face_up(&self, card: CardId) -> bool {
        self.flip_trackers.get(&card).is_some_and(FlipTracker::is_face_up)
    }

    /// Number of storables waiting in reserve for save.
    #[must_use]
    pub fn original_count(&self) -> usize {
        self.original_storables.len()
    }

    /// Turn `storable` and all its cards face up.
    pub fn add_flipped(&mut self, storable: &Storable) {
        for card in storable.cards() {
            self.flip_trackers.entry(card.id()).or_default().flip(true);
        }
        self.flipped.push(storable.id());
        trace!(storable = %storable.id(), flipped = self.flipped.len(), "storable flipped face up");
    }

    /// Turn every face-up card back down.
    pub fn clear_flipped(&mut self) {
        for tracker in self.flip_trackers.values_mut() {
            tracker.flip(false);
        }
        self.flipped.clear();
        trace!("flipped storables cleared");
    }
}

/// Memory-pairing policy.
#[derive(Clone, Debug)]
pub struct MemoryRuleset {
    settings: MemorySettings,
}

impl MemoryRuleset {
    pub fn new(settings: MemorySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    fn grid_shape(count: usize) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        let columns = (count as f32).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        (columns, rows)
    }

    /// Replace `storable` with two paired proxies, keeping it until save.
    fn duplicate_into_pair(&self, state: &mut MemoryState, storable: Storable) -> Vec<Storable> {
        let first = self.instantiate_proxy(state, &storable);
        let second = self.instantiate_proxy(state, &storable);
        state.pairs.insert(first.id(), second.id());
        state.pairs.insert(second.id(), first.id());
        debug!(original = %storable.id(), first = %first.id(), second = %second.id(), "storable duplicated into pair");
        state.original_storables.insert(storable.id(), storable);
        vec![first, second]
    }

    /// Build a proxy storable shaped like `storable`, holding proxies of its cards.
    fn instantiate_proxy(&self, state: &mut MemoryState, storable: &Storable) -> Storable {
        let mut proxy = storable.new_like_this();
        let mut cards: Vec<InventoryStorable> = storable
            .cards()
            .map(|card| {
                let proxy_card = InventoryStorable::proxy_of(card);
                state.flip_trackers.insert(proxy_card.id(), FlipTracker::face_down());
                proxy_card
            })
            .collect();
        proxy.load(&mut cards);
        state.originals.insert(proxy.id(), storable.id());
        proxy
    }
}

impl Ruleset for MemoryRuleset {
    type State = MemoryState;

    fn new_state(&self) -> MemoryState {
        MemoryState::new(self.settings.seed)
    }

    fn max_possible_size_of(&self, children: &[Storable], _state: &MemoryState) -> Vec3 {
        let (columns, rows) = Self::grid_shape(children.len());
        if columns == 0 {
            return Vec3::ZERO;
        }
        let largest = largest_child(children);
        Vec3::new(
            self.settings.card_distance * (columns - 1) as f32 + largest.x,
            self.settings.card_distance * (rows - 1) as f32 + largest.y,
            largest.z,
        )
    }

    fn index_to_store_into(&self, children: &[Storable], _state: &MemoryState) -> usize {
        first_index_where(children, |child| !child.has_no_cards() && !child.has_all_cards_full(), 0)
    }

    fn index_to_insert_after_store(
        &self,
        _children: &[Storable],
        _state: &MemoryState,
        _moved: &Storable,
        original_index: usize,
    ) -> usize {
        original_index
    }

    fn index_to_insert_after_fetch(
        &self,
        _children: &[Storable],
        _state: &MemoryState,
        _moved: &Storable,
        original_index: usize,
    ) -> usize {
        original_index
    }

    fn index_to_flush_between(&self, children: &[Storable], _state: &MemoryState, _new_child: &Storable) -> usize {
        children.len()
    }

    fn can_fetch_from(&self, children: &[Storable], state: &MemoryState, card: CardId) -> bool {
        let Some(child) = children.iter().find(|child| child.contains(card)) else {
            return false;
        };
        child.can_fetch(card) && (child.has_all_cards_empty() || state.is_matched(child.id()))
    }

    fn card_textures(&self) -> Vec<TextureId> {
        self.settings.textures.clone()
    }

    fn tick(&self, _children: &[Storable], _state: &mut MemoryState, _delta_time: f32) {}

    fn layout(&self, children: &[Storable], _state: &MemoryState) -> Vec<Vec3> {
        let (columns, rows) = Self::grid_shape(children.len());
        let spacing = self.settings.card_distance;
        let half_width = (columns.saturating_sub(1)) as f32 / 2.0;
        let half_height = (rows.saturating_sub(1)) as f32 / 2.0;
        (0..children.len())
            .map(|index| {
                let column = (index % columns) as f32;
                let row = (index / columns) as f32;
                Vec3::new((column - half_width) * spacing, (half_height - row) * spacing, 0.0)
            })
            .collect()
    }

    fn before_store(&self, children: &mut [Storable], state: &mut MemoryState) {
        state.rng.shuffle(children);
    }

    fn before_fetch(&self, children: &[Storable], state: &mut MemoryState, card: CardId) {
        if let FlipOutcome::Matched(storable) = self.flip(children, state, card) {
            debug!(%storable, "matched pair resolved");
            state.clear_flipped();
        }
    }

    fn flip(&self, children: &[Storable], state: &mut MemoryState, card: CardId) -> FlipOutcome {
        let Some(storable) = children.iter().find(|child| child.contains(card)) else {
            return FlipOutcome::NoOp;
        };
        let id = storable.id();

        if state.is_flipped(id) {
            return if state.is_matched(id) {
                FlipOutcome::Matched(id)
            } else {
                FlipOutcome::NoOp
            };
        }

        let empty = storable.has_all_cards_empty();
        if state.flipped.len() >= 2 && !empty {
            state.clear_flipped();
        }
        if state.flipped.len() < 2 && !empty {
            state.add_flipped(storable);
        }
        FlipOutcome::NoOp
    }

    fn storables_per_created(&self) -> usize {
        2
    }

    fn load_storable_hook(&self, state: &mut MemoryState, storable: Storable) -> Vec<Storable> {
        self.duplicate_into_pair(state, storable)
    }

    fn flush_storable_hook(&self, state: &mut MemoryState, storable: Storable) -> Vec<Storable> {
        self.duplicate_into_pair(state, storable)
    }

    fn save_storable_hook(&self, state: &mut MemoryState, storable: Storable) -> Vec<Storable> {
        for card in storable.cards() {
            state.flip_trackers.remove(&card.id());
        }
        let id = storable.id();
        state.flipped.retain(|flipped| *flipped != id);
        if let Some(pair) = state.pairs.remove(&id) {
            state.pairs.remove(&pair);
        }
        match state.originals.remove(&id) {
            // Both proxies map to the same original; only the first one saved hands it back.
            Some(original) => state.original_storables.remove(&original).into_iter().collect(),
            None => vec![storable],
        }
    }
}
