//! Input intents
//!
//! Event handlers only push intents; [`crate::sim::tick`] drains the queue at
//! the start of each fixed step, so physics state is never touched mid-step.

use std::collections::VecDeque;

use glam::DVec2;

use crate::upgrades::UpgradeKind;

/// One discrete request from the player, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Begin a round (from the menu or the results screen)
    NewRound,
    /// Back to the menu
    ReturnToMenu,
    StartAim(DVec2),
    DragAim(DVec2),
    ReleaseAim,
    /// Held pitch keys; both may be held
    SetPitch { up: bool, down: bool },
    /// Buy the next level of an upgrade (between rounds only)
    PurchaseUpgrade(UpgradeKind),
}

/// Held pitch controls, consumed every step while in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PitchInput {
    pub up: bool,
    pub down: bool,
}

/// FIFO of pending intents
#[derive(Debug, Default)]
pub struct IntentQueue {
    queue: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn pop(&mut self) -> Option<Intent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
