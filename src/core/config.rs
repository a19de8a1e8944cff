//! Storage definitions.
//!
//! Deques are configured at startup by describing the shape of their tree:
//! - `StorableDefinition`: what a node is (a single card slot or a group)
//! - `StorableGroupDefinition`: capacity, child shape and governing ruleset
//! - `RulesetKind`: which policy governs a group, with its settings
//!
//! Groups synthesize new children from their `subdefinition` whenever a flush
//! or load needs more capacity, so a definition fully describes every tree
//! it can grow into.

use serde::{Deserialize, Serialize};

use super::entity::TextureId;
use super::error::{Result, StorageError};
use super::geometry::Vec3;

/// Settings for the left-to-right array layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArraySettings {
    /// Horizontal distance between neighbouring children.
    pub card_distance: f32,

    /// Amplitude of the vertical wobble.
    pub wobble_height: f32,

    /// Phase shift of the wobble between neighbouring children, in seconds.
    pub wobble_time_offset: f32,

    /// Textures this layer contributes to card faces.
    pub textures: Vec<TextureId>,
}

impl Default for ArraySettings {
    fn default() -> Self {
        Self {
            card_distance: 0.1,
            wobble_height: 0.1,
            wobble_time_offset: 1.0,
            textures: Vec::new(),
        }
    }
}

/// Settings for the memory-pairing grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemorySettings {
    /// Spacing between grid cells, on both axes.
    pub card_distance: f32,

    /// Seed for the store-time shuffle.
    pub seed: u64,

    /// Textures this layer contributes to card faces.
    pub textures: Vec<TextureId>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            card_distance: 0.1,
            seed: 0,
            textures: Vec::new(),
        }
    }
}

/// Which ruleset governs a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RulesetKind {
    Array(ArraySettings),
    Memory(MemorySettings),
}

impl Default for RulesetKind {
    fn default() -> Self {
        RulesetKind::Array(ArraySettings::default())
    }
}

/// Shape of a tree node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StorableDefinition {
    /// A single card slot of the given physical size.
    Slot { card_size: Vec3 },
    /// A group of child storables.
    Group(Box<StorableGroupDefinition>),
}

impl StorableDefinition {
    /// A slot holding a standard-sized card.
    #[must_use]
    pub fn slot() -> Self {
        StorableDefinition::Slot {
            card_size: Vec3::new(0.08, 0.12, 0.002),
        }
    }

    /// A nested group.
    #[must_use]
    pub fn group(definition: StorableGroupDefinition) -> Self {
        StorableDefinition::Group(Box::new(definition))
    }

    /// Check this definition and everything beneath it.
    pub fn validate(&self) -> Result<()> {
        match self {
            StorableDefinition::Slot { .. } => Ok(()),
            StorableDefinition::Group(group) => group.validate(),
        }
    }
}

/// Definition of a group of storables.
///
/// ## Example
///
/// ```
/// use capturellection::core::{StorableDefinition, StorableGroupDefinition, RulesetKind, MemorySettings};
///
/// let board = StorableGroupDefinition::new("memory", 4, StorableDefinition::slot())
///     .with_ruleset(RulesetKind::Memory(MemorySettings::default()));
///
/// assert!(board.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorableGroupDefinition {
    /// Human-readable name (for logging).
    pub name: String,

    /// Maximum number of direct children.
    pub max_storables: usize,

    /// Shape of children synthesized by flush and load.
    pub subdefinition: StorableDefinition,

    /// Governing ruleset.
    pub ruleset: RulesetKind,
}

impl StorableGroupDefinition {
    /// Create a group definition governed by the default array ruleset.
    pub fn new(name: impl Into<String>, max_storables: usize, subdefinition: StorableDefinition) -> Self {
        Self {
            name: name.into(),
            max_storables,
            subdefinition,
            ruleset: RulesetKind::default(),
        }
    }

    /// Set the governing ruleset.
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: RulesetKind) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Check capacity constraints, recursively.
    ///
    /// Memory groups duplicate every loaded storable into a pair, so their
    /// capacity must be even.
    pub fn validate(&self) -> Result<()> {
        if self.max_storables == 0 {
            return Err(StorageError::InvalidDefinition(format!(
                "group '{}' must hold at least one storable",
                self.name
            )));
        }
        if matches!(self.ruleset, RulesetKind::Memory(_)) && self.max_storables % 2 != 0 {
            return Err(StorageError::InvalidDefinition(format!(
                "memory group '{}' needs an even capacity, got {}",
                self.name, self.max_storables
            )));
        }
        self.subdefinition.validate()
    }
}
