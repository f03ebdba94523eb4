//! Collectible coins

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, Sprite, SpriteKind};
use crate::consts::{COIN_BOB_AMOUNT, COIN_BOB_SPEED, COIN_RADIUS, COIN_SPIN_SPEED, COIN_VALUE};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub body: Body,
    pub radius: f64,
    pub value: u64,
    /// Terminal: a collected coin stays collected and inactive
    pub collected: bool,
    /// Vertical bob animation phase (radians)
    pub bob_phase: f64,
    pub bob_speed: f64,
    pub bob_amount: f64,
    pub spin_speed: f64,
}

impl Default for Coin {
    fn default() -> Self {
        Self {
            body: Body {
                size: DVec2::splat(COIN_RADIUS * 2.0),
                ..Body::default()
            },
            radius: COIN_RADIUS,
            value: COIN_VALUE,
            collected: false,
            bob_phase: 0.0,
            bob_speed: COIN_BOB_SPEED,
            bob_amount: COIN_BOB_AMOUNT,
            spin_speed: COIN_SPIN_SPEED,
        }
    }
}

impl Coin {
    /// Place a freshly acquired coin in the field
    pub fn spawn(&mut self, pos: DVec2, bob_phase: f64, tuning: &Tuning) {
        self.radius = tuning.coin_radius;
        self.value = tuning.coin_value;
        self.bob_speed = tuning.coin_bob_speed;
        self.bob_amount = tuning.coin_bob_amount;
        self.spin_speed = tuning.coin_spin_speed;
        self.body.size = DVec2::splat(self.radius * 2.0);
        self.body.place(pos);
        self.bob_phase = bob_phase;
        self.body.active = true;
    }

    /// Mark collected. Returns true only the first time.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.active = false;
        true
    }

    /// Current vertical draw offset from the bob animation
    #[inline]
    pub fn bob_offset(&self) -> f64 {
        self.bob_phase.sin() * self.bob_amount
    }
}

impl Entity for Coin {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn step(&mut self, h: f64, _tuning: &Tuning) {
        if !self.body.active || self.collected {
            return;
        }
        self.bob_phase += self.bob_speed * h;
        self.body.rotation += self.spin_speed * h;
    }

    fn sprite(&self) -> Sprite {
        let bob = DVec2::new(0.0, self.bob_offset());
        Sprite {
            kind: SpriteKind::Coin,
            pos: self.body.pos + bob,
            prev_pos: self.body.prev_pos + bob,
            rotation: self.body.rotation,
            size: self.body.size,
        }
    }
}
