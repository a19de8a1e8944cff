//! Items, capture containers and capture cards.
//!
//! These are the payloads the storage tree moves around. The world owns
//! items; cards own (shared handles to) the containers that hold them.

pub mod item;
pub mod container;
pub mod card;

pub use item::Item;
pub use container::{CaptureContainer, SharedContainer};
pub use card::InventoryStorable;
