//! Named animation destinations.

use serde::{Deserialize, Serialize};

use crate::core::geometry::Vec3;

/// A place a card's visual can move to.
///
/// Owned by whatever exposes it (a deque slot, a layout area); card state
/// machines hold copies, never the owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTarget {
    pub name: String,
    pub position: Vec3,
}

impl CardTarget {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}
