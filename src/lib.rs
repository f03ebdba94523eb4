//! Slingshot Flight - a slingshot plane-flight game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, pooling, flight physics, camera, phases)
//! - `platform`: Clock and frame statistics for the loop drivers
//! - `persistence`: Progress save/load behind a key-value store trait
//! - `upgrades`: Upgrade shop (levels, costs, multipliers)
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod upgrades;

pub use error::{PersistError, PersistResult, PhaseError, TuningError};
pub use tuning::Tuning;
pub use upgrades::{Multipliers, Progress, UpgradeKind, UpgradeShop};

/// Game configuration constants
pub mod consts {
    /// Design resolution (landscape, side scrolling)
    pub const GAME_WIDTH: f64 = 1280.0;
    pub const GAME_HEIGHT: f64 = 720.0;

    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;
    /// Maximum fixed steps per display frame before the frame-drop panic
    pub const MAX_STEPS_PER_FRAME: u32 = 240;

    /// Gravity (world units/s², +y is down)
    pub const GRAVITY: f64 = 400.0;
    /// Linear drag applied once per step
    pub const AIR_RESISTANCE: f64 = 0.02;
    pub const LIFT_COEFFICIENT: f64 = 0.8;
    /// No lift at or below this speed
    pub const MIN_SPEED_FOR_LIFT: f64 = 50.0;

    /// Slingshot anchor and pull limits
    pub const SLINGSHOT_X: f64 = 150.0;
    pub const SLINGSHOT_Y: f64 = 500.0;
    pub const SLINGSHOT_MAX_PULL: f64 = 150.0;
    pub const SLINGSHOT_POWER_MULT: f64 = 8.0;
    /// Releases at or below this fraction of max pull don't launch
    pub const SLINGSHOT_MIN_POWER: f64 = 0.1;

    /// Plane pitch rate (rad/s) and limit (±60°)
    pub const PLANE_ROTATION_SPEED: f64 = 3.0;
    pub const PLANE_MAX_PITCH: f64 = std::f64::consts::FRAC_PI_3;
    pub const PLANE_WIDTH: f64 = 60.0;
    pub const PLANE_HEIGHT: f64 = 20.0;

    /// Camera lead in front of the plane
    pub const CAMERA_FOLLOW_OFFSET_X: f64 = 300.0;
    pub const CAMERA_SMOOTHNESS: f64 = 0.08;
    /// Culling margin around the viewport
    pub const CAMERA_CULL_MARGIN: f64 = 100.0;

    /// Ground band height, measured up from the bottom of the design area
    pub const GROUND_HEIGHT: f64 = 100.0;
    pub const GROUND_Y: f64 = GAME_HEIGHT - GROUND_HEIGHT;

    /// Coins
    pub const COIN_RADIUS: f64 = 15.0;
    pub const COIN_VALUE: u64 = 10;
    pub const COIN_SPAWN_INTERVAL: f64 = 200.0;
    pub const COIN_INITIAL_COUNT: usize = 20;
    /// First coin is placed this far past the slingshot
    pub const COIN_FIELD_START: f64 = 300.0;
    /// Coins spawn between these heights above the ground line
    pub const COIN_MIN_ALTITUDE: f64 = 50.0;
    pub const COIN_ALTITUDE_RANGE: f64 = 400.0;
    pub const COIN_BOB_SPEED: f64 = 3.0;
    pub const COIN_BOB_AMOUNT: f64 = 5.0;
    pub const COIN_SPIN_SPEED: f64 = 2.0;
}
