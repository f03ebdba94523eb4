//! Shared entity attributes and the capability trait every pooled kind implements

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Attributes common to every simulated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position (world units, +y down)
    pub pos: DVec2,
    /// Position at the start of the last step (for render interpolation)
    pub prev_pos: DVec2,
    /// Orientation (radians)
    pub rotation: f64,
    /// Full width/height of the bounding box
    pub size: DVec2,
    /// Inactive entities are never stepped or collision-tested
    pub active: bool,
    pub visible: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: DVec2::ZERO,
            prev_pos: DVec2::ZERO,
            rotation: 0.0,
            size: DVec2::ZERO,
            active: false,
            visible: true,
        }
    }
}

impl Body {
    #[inline]
    pub fn half_extents(&self) -> DVec2 {
        self.size / 2.0
    }

    /// Move without leaving an interpolation trail
    pub fn place(&mut self, pos: DVec2) {
        self.pos = pos;
        self.prev_pos = pos;
    }
}

/// What a sprite should be drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Plane,
    Coin,
}

/// Render data handed to the external render sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: DVec2,
    pub prev_pos: DVec2,
    pub rotation: f64,
    pub size: DVec2,
}

impl Sprite {
    /// Position blended between the last two simulated states
    #[inline]
    pub fn interpolated(&self, alpha: f64) -> DVec2 {
        self.prev_pos.lerp(self.pos, alpha)
    }
}

/// Capability interface for simulated objects.
///
/// `Default` must produce the same state as [`Entity::reset`]; the pool
/// relies on this when it allocates fresh slots.
pub trait Entity: Default {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Restore the freshly-allocated state
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by one fixed step of `h` seconds
    fn step(&mut self, h: f64, tuning: &Tuning);

    fn sprite(&self) -> Sprite;

    #[inline]
    fn is_active(&self) -> bool {
        self.body().active
    }
}
