//! Flight dynamics for the launched plane
//!
//! Per step, in this order (the order changes the numbers):
//! 1. gravity
//! 2. linear drag (one damping factor per step, reduced by the fuselage upgrade)
//! 3. lift, above a minimum speed, strongest with the nose up
//! 4. explicit Euler position update
//! 5. nose eased toward the velocity direction
//! 6. distance / peak altitude bookkeeping
//! 7. ground contact

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, Sprite, SpriteKind};
use crate::consts::{PLANE_HEIGHT, PLANE_WIDTH};
use crate::tuning::Tuning;
use crate::upgrades::Multipliers;

/// Weight kept from the previous angle each step when easing the nose
const ANGLE_RETAIN: f64 = 0.9;

/// The player's plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingBody {
    pub body: Body,
    pub vel: DVec2,
    pub launched: bool,
    pub flying: bool,
    pub landed: bool,
    /// x at launch, origin for distance
    pub launch_x: f64,
    pub distance: f64,
    /// Highest point reached, measured up from the ground line
    pub peak_altitude: f64,
    pub multipliers: Multipliers,
}

impl Default for FlyingBody {
    fn default() -> Self {
        Self {
            body: Body {
                size: DVec2::new(PLANE_WIDTH, PLANE_HEIGHT),
                ..Body::default()
            },
            vel: DVec2::ZERO,
            launched: false,
            flying: false,
            landed: false,
            launch_x: 0.0,
            distance: 0.0,
            peak_altitude: 0.0,
            multipliers: Multipliers::default(),
        }
    }
}

/// Velocity scale applied once per step
#[inline]
fn drag_factor(air_resistance: f64, fuselage: f64) -> f64 {
    if air_resistance <= 0.0 {
        return 1.0;
    }
    if fuselage <= 0.0 {
        return 0.0;
    }
    (1.0 - air_resistance / fuselage).max(0.0)
}

impl FlyingBody {
    /// Ready a freshly acquired plane for a round
    pub fn prepare(&mut self, pos: DVec2, multipliers: Multipliers, tuning: &Tuning) {
        self.body.size = DVec2::new(tuning.plane_width, tuning.plane_height);
        self.body.place(pos);
        self.body.active = true;
        self.multipliers = multipliers;
    }

    /// Fire with the slingshot velocity; the engine upgrade scales it
    pub fn launch(&mut self, vel: DVec2) {
        self.vel = vel * self.multipliers.engine;
        self.body.rotation = vel.y.atan2(vel.x);
        self.body.prev_pos = self.body.pos;
        self.launch_x = self.body.pos.x;
        self.launched = true;
        self.flying = true;
        self.body.active = true;
    }

    /// Nose up (negative angle in screen space)
    pub fn pitch_up(&mut self, h: f64, tuning: &Tuning) {
        if !self.flying {
            return;
        }
        self.body.rotation =
            (self.body.rotation - tuning.rotation_speed * h).max(-tuning.max_pitch);
    }

    /// Nose down
    pub fn pitch_down(&mut self, h: f64, tuning: &Tuning) {
        if !self.flying {
            return;
        }
        self.body.rotation =
            (self.body.rotation + tuning.rotation_speed * h).min(tuning.max_pitch);
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.body.rotation
    }

    fn land(&mut self) {
        self.flying = false;
        self.landed = true;
        self.vel = DVec2::ZERO;
    }
}

impl Entity for FlyingBody {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn step(&mut self, h: f64, tuning: &Tuning) {
        if !self.body.active || !self.flying || self.landed {
            return;
        }
        self.body.prev_pos = self.body.pos;

        // Lift uses the speed from before this step's forces
        let speed = self.vel.length();

        self.vel.y += tuning.gravity * h;

        self.vel *= drag_factor(tuning.air_resistance, self.multipliers.fuselage);

        if speed > tuning.min_speed_for_lift {
            let lift_angle = -self.body.rotation.sin();
            let lift = tuning.lift_coefficient * self.multipliers.wings * speed * lift_angle * h;
            self.vel.y -= lift;
        }

        self.body.pos += self.vel * h;

        let target = self.vel.y.atan2(self.vel.x);
        self.body.rotation = self.body.rotation * ANGLE_RETAIN + target * (1.0 - ANGLE_RETAIN);

        self.distance = (self.body.pos.x - self.launch_x).max(0.0);
        self.peak_altitude = self.peak_altitude.max(tuning.ground_y - self.body.pos.y);

        let rest_y = tuning.ground_y - self.body.size.y / 2.0;
        if self.body.pos.y >= rest_y {
            self.body.pos.y = rest_y;
            self.land();
        }
    }

    fn sprite(&self) -> Sprite {
        Sprite {
            kind: SpriteKind::Plane,
            pos: self.body.pos,
            prev_pos: self.body.prev_pos,
            rotation: self.body.rotation,
            size: self.body.size,
        }
    }
}
