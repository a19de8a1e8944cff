//! Card positions: animation targets, layout areas and the per-card state
//! machine that moves a card's visual between them.
//!
//! ## Key Types
//!
//! - [`CardTarget`]: a named destination
//! - [`CardAnimator`]: non-blocking motion toward a target
//! - [`LayoutArea`] / [`LayoutAdder`]: a staging surface and the destination
//!   provider that sends cards to it
//! - [`DequeElementStateMachine`]: `InDeque` <-> `InLayoutArea`

mod target;
mod animator;
mod area;
mod state;

pub use target::CardTarget;
pub use animator::CardAnimator;
pub use area::{LayoutAdder, LayoutArea};
pub use state::{CardEvent, CardState, DequeElementStateMachine};
