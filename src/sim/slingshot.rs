//! Slingshot launcher
//!
//! The pull is the offset from the anchor to the drag point, capped at
//! `max_pull` and never pointing right (launches always go right).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slingshot {
    pub anchor: DVec2,
    pub dragging: bool,
    pub pull: DVec2,
    pub max_pull: f64,
    pub power_mult: f64,
    /// Releases at or below this power are ignored
    pub min_power: f64,
}

impl Slingshot {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            anchor: DVec2::new(tuning.slingshot_x, tuning.slingshot_y),
            dragging: false,
            pull: DVec2::ZERO,
            max_pull: tuning.slingshot_max_pull,
            power_mult: tuning.slingshot_power_mult,
            min_power: tuning.slingshot_min_power,
        }
    }

    pub fn start_drag(&mut self, point: DVec2) {
        self.dragging = true;
        self.update_pull(point);
    }

    pub fn drag(&mut self, point: DVec2) {
        if !self.dragging {
            return;
        }
        self.update_pull(point);
    }

    /// Let go. Returns the launch velocity if the pull was strong enough.
    pub fn release(&mut self) -> Option<DVec2> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;

        let power = self.pull.length() / self.max_pull;
        let vel = -self.pull * self.power_mult;
        self.pull = DVec2::ZERO;

        (power > self.min_power).then_some(vel)
    }

    fn update_pull(&mut self, point: DVec2) {
        let mut offset = point - self.anchor;
        let dist = offset.length();
        if dist > self.max_pull {
            offset *= self.max_pull / dist;
        }
        if offset.x > 0.0 {
            offset.x = 0.0;
        }
        self.pull = offset;
    }

    /// Pull strength in [0, 1]
    pub fn power(&self) -> f64 {
        (self.pull.length() / self.max_pull).min(1.0)
    }

    /// Where the loaded plane sits
    pub fn plane_position(&self) -> DVec2 {
        self.anchor + self.pull
    }

    pub fn reset(&mut self) {
        self.dragging = false;
        self.pull = DVec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slingshot() -> Slingshot {
        Slingshot::new(&Tuning::default())
    }

    #[test]
    fn test_pull_clamped() {
        let mut s = slingshot();
        s.start_drag(s.anchor + DVec2::new(-300.0, 400.0));
        assert!((s.pull.length() - 150.0).abs() < 1e-9);
        assert!((s.power() - 1.0).abs() < 1e-9);
        // Direction preserved: (-0.6, 0.8) * 150
        assert!((s.pull.x + 90.0).abs() < 1e-9);
        assert!((s.pull.y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_pull_never_points_right() {
        let mut s = slingshot();
        s.start_drag(s.anchor + DVec2::new(80.0, 30.0));
        assert_eq!(s.pull, DVec2::new(0.0, 30.0));
    }

    #[test]
    fn test_release_launches_opposite_to_pull() {
        let mut s = slingshot();
        s.start_drag(s.anchor);
        s.drag(s.anchor + DVec2::new(-100.0, 50.0));
        let vel = s.release().unwrap();
        assert_eq!(vel, DVec2::new(800.0, -400.0));
        assert!(!s.dragging);
        assert_eq!(s.pull, DVec2::ZERO);
        assert_eq!(s.plane_position(), s.anchor);
    }

    #[test]
    fn test_weak_release_ignored() {
        let mut s = slingshot();
        s.start_drag(s.anchor + DVec2::new(-10.0, 0.0));
        assert_eq!(s.release(), None);
        assert!(!s.dragging);
    }

    #[test]
    fn test_drag_without_start_ignored() {
        let mut s = slingshot();
        s.drag(s.anchor + DVec2::new(-100.0, 0.0));
        assert_eq!(s.pull, DVec2::ZERO);
        assert_eq!(s.release(), None);
    }
}
