//! # capturellection
//!
//! A recursively composable card storage engine.
//!
//! Items are captured into cards, cards sit in slots, and slots are grouped
//! into trees whose ordering, eligibility and layout are decided by
//! swappable rulesets. Specialized rulesets layer game rules on top of the
//! generic tree; the memory ruleset turns a group into a pairs-matching board.
//!
//! ## Design Principles
//!
//! 1. **One contract, any depth**: slots and groups answer the same
//!    operations, so trees nest without special cases.
//!
//! 2. **Policy outside the tree**: groups never decide placement themselves.
//!    A ruleset is a stateless policy plus a state value the group owns and
//!    lends to every call.
//!
//! 3. **Ownership is membership**: cards are moved, never copied, so a card
//!    is in exactly one place. Memory proxies are new cards sharing a
//!    container, not copies.
//!
//! 4. **Configuration over convention**: trees grow from serializable
//!    definitions.
//!
//! ## Modules
//!
//! - `core`: IDs, errors, geometry, RNG, definitions
//! - `items`: items, capture containers, capture cards
//! - `storage`: the storable tree
//! - `rulesets`: ruleset policies (array, memory)
//! - `layout`: card targets, layout areas, the card state machine

pub mod core;
pub mod items;
pub mod storage;
pub mod rulesets;
pub mod layout;

// Re-export commonly used types
pub use crate::core::{
    CardId, ItemId, StorableId, TextureId,
    StorageError, Result,
    Vec3, DequeRng,
    ArraySettings, MemorySettings, RulesetKind, StorableDefinition, StorableGroupDefinition,
};

pub use crate::items::{CaptureContainer, InventoryStorable, Item, SharedContainer};

pub use crate::storage::{CardSlot, Cards, FlipOutcome, Storable, StorableGroup, StoreResult};

pub use crate::rulesets::{
    ArrayRuleset, ArrayState, FlipTracker, GroupRuleset, MemoryRuleset, MemoryState, Ruleset,
};

pub use crate::layout::{
    CardAnimator, CardEvent, CardState, CardTarget, DequeElementStateMachine, LayoutAdder, LayoutArea,
};
