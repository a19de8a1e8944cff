//! Non-blocking card motion.
//!
//! `move_to` only records where the card should go; `tick` moves it there a
//! little each frame. Callers never wait on an animation.

use tracing::trace;

use crate::core::geometry::Vec3;

use super::target::CardTarget;

const ARRIVAL_EPSILON: f32 = 1e-4;

/// Moves a card's visual toward its current target at a fixed speed.
#[derive(Clone, Debug, PartialEq)]
pub struct CardAnimator {
    position: Vec3,
    target: Option<CardTarget>,
    speed: f32,
}

impl CardAnimator {
    /// An idle animator at `position`, moving `speed` units per second.
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            target: None,
            speed,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn target(&self) -> Option<&CardTarget> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    /// Start moving toward `target`. Returns immediately.
    pub fn move_to(&mut self, target: &CardTarget) {
        trace!(target = %target.name, "animation started");
        self.target = Some(target.clone());
    }

    /// Jump straight to `target`, cancelling any motion.
    pub fn teleport_to(&mut self, target: &CardTarget) {
        self.position = target.position;
        self.target = None;
    }

    /// Advance the motion. Returns `true` on the frame the card arrives.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let Some(target) = self.target.as_ref() else {
            return false;
        };
        let remaining = (target.position - self.position).length();
        let step = self.speed * delta_time;
        if remaining <= step || remaining <= ARRIVAL_EPSILON {
            self.position = target.position;
            self.target = None;
            return true;
        }
        self.position = self.position.lerp(target.position, step / remaining);
        false
    }
}
