//! Core types: identifiers, errors, geometry, RNG and definitions.
//!
//! Nothing in here knows about trees or rulesets; higher layers build on it.

pub mod entity;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod config;

pub use entity::{CardId, ItemId, StorableId, TextureId};
pub use error::{Result, StorageError};
pub use geometry::Vec3;
pub use rng::DequeRng;
pub use config::{ArraySettings, MemorySettings, RulesetKind, StorableDefinition, StorableGroupDefinition};
