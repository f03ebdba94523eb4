//! Side-scrolling follow camera
//!
//! Smoothing is a fixed fraction per simulation step, not scaled by time, so
//! its feel is tied to the fixed step rate. Horizontally the camera only ever
//! moves right: `min_x` remembers the furthest origin reached this round.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowCamera {
    /// Viewport origin (top-left) in world units
    pub pos: DVec2,
    /// Horizontal floor; never decreases within a round
    pub min_x: f64,
    pub smoothness: f64,
    /// How far behind the target the left edge sits
    pub follow_offset_x: f64,
    pub viewport: DVec2,
    pub cull_margin: f64,
}

impl FollowCamera {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: DVec2::ZERO,
            min_x: 0.0,
            smoothness: tuning.camera_smoothness,
            follow_offset_x: tuning.camera_follow_offset_x,
            viewport: DVec2::new(tuning.viewport_width, tuning.viewport_height),
            cull_margin: tuning.cull_margin,
        }
    }

    /// Origin the camera wants for a target at `target`
    pub fn goal(&self, target: DVec2) -> DVec2 {
        DVec2::new(
            (target.x - self.follow_offset_x).max(self.min_x),
            (target.y - self.viewport.y / 2.0).max(0.0),
        )
    }

    /// One smoothing step toward the target
    pub fn update(&mut self, target: DVec2) {
        let goal = self.goal(target);
        self.pos += (goal - self.pos) * self.smoothness;
        self.min_x = self.min_x.max(self.pos.x);
    }

    /// Jump straight to the target (no lag on the first flight frame)
    pub fn snap_to(&mut self, target: DVec2) {
        self.pos = self.goal(target);
        self.min_x = self.min_x.max(self.pos.x);
    }

    /// Back to the round start
    pub fn reset(&mut self) {
        self.pos = DVec2::ZERO;
        self.min_x = 0.0;
    }

    /// Whether a box centered at `center` overlaps the margin-padded viewport
    pub fn is_visible(&self, center: DVec2, size: DVec2) -> bool {
        let half = size / 2.0;
        let lo = self.pos - DVec2::splat(self.cull_margin);
        let hi = self.pos + self.viewport + DVec2::splat(self.cull_margin);
        center.x + half.x > lo.x
            && center.x - half.x < hi.x
            && center.y + half.y > lo.y
            && center.y - half.y < hi.y
    }

    #[inline]
    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        world - self.pos
    }

    #[inline]
    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        screen + self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn camera() -> FollowCamera {
        FollowCamera::new(&Tuning::default())
    }

    #[test]
    fn test_update_moves_fraction_of_gap() {
        let mut cam = camera();
        cam.update(DVec2::new(1300.0, 900.0));
        // goal = (1000, 540)
        assert!((cam.pos.x - 1000.0 * 0.08).abs() < 1e-9);
        assert!((cam.pos.y - 540.0 * 0.08).abs() < 1e-9);
        assert_eq!(cam.min_x, cam.pos.x);
    }

    #[test]
    fn test_snap() {
        let mut cam = camera();
        cam.snap_to(DVec2::new(800.0, 100.0));
        assert_eq!(cam.pos, DVec2::new(500.0, 0.0));
        assert_eq!(cam.min_x, 500.0);
    }

    #[test]
    fn test_never_scrolls_back() {
        let mut cam = camera();
        for _ in 0..200 {
            cam.update(DVec2::new(2000.0, 300.0));
        }
        let far = cam.pos.x;
        for _ in 0..200 {
            cam.update(DVec2::new(0.0, 300.0));
        }
        assert!(cam.pos.x >= far);
        assert!(cam.min_x >= far);
    }

    #[test]
    fn test_visibility_margin() {
        let cam = camera();
        let size = DVec2::splat(30.0);
        assert!(cam.is_visible(DVec2::new(640.0, 360.0), size));
        // Just inside the 100-unit margin on the left
        assert!(cam.is_visible(DVec2::new(-110.0, 360.0), size));
        assert!(!cam.is_visible(DVec2::new(-120.0, 360.0), size));
        assert!(!cam.is_visible(DVec2::new(1280.0 + 120.0, 360.0), size));
        assert!(!cam.is_visible(DVec2::new(640.0, 720.0 + 120.0), size));
    }

    #[test]
    fn test_screen_world_inverse() {
        let mut cam = camera();
        cam.snap_to(DVec2::new(1234.0, 987.0));
        let p = DVec2::new(55.0, 66.0);
        assert_eq!(cam.world_to_screen(cam.screen_to_world(p)), p);
    }

    proptest! {
        #[test]
        fn prop_floor_monotonic(
            targets in proptest::collection::vec((-5000.0f64..5000.0, -2000.0f64..2000.0), 1..300)
        ) {
            let mut cam = camera();
            let mut last_floor = cam.min_x;
            for (x, y) in targets {
                cam.update(DVec2::new(x, y));
                prop_assert!(cam.min_x >= last_floor);
                prop_assert!(cam.pos.x <= cam.min_x);
                prop_assert!(cam.pos.y >= 0.0);
                last_floor = cam.min_x;
            }
        }

        #[test]
        fn prop_trails_advancing_target(steps in proptest::collection::vec(0.0f64..50.0, 1..300)) {
            let mut cam = camera();
            let mut x = 150.0;
            for dx in steps {
                x += dx;
                cam.update(DVec2::new(x, 300.0));
                prop_assert!(cam.pos.x <= (x - cam.follow_offset_x).max(0.0) + 1e-9);
            }
        }
    }
}
