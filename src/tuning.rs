//! Data-driven game balance
//!
//! [`Tuning`] mirrors every constant in [`crate::consts`]. A JSON document can
//! override any subset of fields; missing keys keep the compile-time defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable physics and gameplay values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Loop ===
    pub fixed_timestep: f64,
    pub max_steps_per_frame: u32,

    // === Flight ===
    pub gravity: f64,
    pub air_resistance: f64,
    pub lift_coefficient: f64,
    pub min_speed_for_lift: f64,
    pub rotation_speed: f64,
    pub max_pitch: f64,
    pub plane_width: f64,
    pub plane_height: f64,
    pub ground_y: f64,

    // === Camera ===
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub camera_follow_offset_x: f64,
    pub camera_smoothness: f64,
    pub cull_margin: f64,

    // === Slingshot ===
    pub slingshot_x: f64,
    pub slingshot_y: f64,
    pub slingshot_max_pull: f64,
    pub slingshot_power_mult: f64,
    pub slingshot_min_power: f64,

    // === Coins ===
    pub coin_radius: f64,
    pub coin_value: u64,
    pub coin_spawn_interval: f64,
    pub coin_initial_count: usize,
    pub coin_field_start: f64,
    pub coin_min_altitude: f64,
    pub coin_altitude_range: f64,
    pub coin_bob_speed: f64,
    pub coin_bob_amount: f64,
    pub coin_spin_speed: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fixed_timestep: FIXED_TIMESTEP,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,

            gravity: GRAVITY,
            air_resistance: AIR_RESISTANCE,
            lift_coefficient: LIFT_COEFFICIENT,
            min_speed_for_lift: MIN_SPEED_FOR_LIFT,
            rotation_speed: PLANE_ROTATION_SPEED,
            max_pitch: PLANE_MAX_PITCH,
            plane_width: PLANE_WIDTH,
            plane_height: PLANE_HEIGHT,
            ground_y: GROUND_Y,

            viewport_width: GAME_WIDTH,
            viewport_height: GAME_HEIGHT,
            camera_follow_offset_x: CAMERA_FOLLOW_OFFSET_X,
            camera_smoothness: CAMERA_SMOOTHNESS,
            cull_margin: CAMERA_CULL_MARGIN,

            slingshot_x: SLINGSHOT_X,
            slingshot_y: SLINGSHOT_Y,
            slingshot_max_pull: SLINGSHOT_MAX_PULL,
            slingshot_power_mult: SLINGSHOT_POWER_MULT,
            slingshot_min_power: SLINGSHOT_MIN_POWER,

            coin_radius: COIN_RADIUS,
            coin_value: COIN_VALUE,
            coin_spawn_interval: COIN_SPAWN_INTERVAL,
            coin_initial_count: COIN_INITIAL_COUNT,
            coin_field_start: COIN_FIELD_START,
            coin_min_altitude: COIN_MIN_ALTITUDE,
            coin_altitude_range: COIN_ALTITUDE_RANGE,
            coin_bob_speed: COIN_BOB_SPEED,
            coin_bob_amount: COIN_BOB_AMOUNT,
            coin_spin_speed: COIN_SPIN_SPEED,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Like [`Tuning::from_json`], but any failure yields the defaults
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning document: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values that break the loop or the integrator
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.fixed_timestep > 0.0) {
            return Err(TuningError::OutOfRange {
                name: "fixed_timestep",
                value: self.fixed_timestep,
                range: "(0, inf)",
            });
        }
        if self.max_steps_per_frame == 0 {
            return Err(TuningError::OutOfRange {
                name: "max_steps_per_frame",
                value: 0.0,
                range: "[1, inf)",
            });
        }
        if !(self.camera_smoothness > 0.0 && self.camera_smoothness <= 1.0) {
            return Err(TuningError::OutOfRange {
                name: "camera_smoothness",
                value: self.camera_smoothness,
                range: "(0, 1]",
            });
        }
        if !(0.0..1.0).contains(&self.air_resistance) {
            return Err(TuningError::OutOfRange {
                name: "air_resistance",
                value: self.air_resistance,
                range: "[0, 1)",
            });
        }
        if !(self.slingshot_max_pull > 0.0) {
            return Err(TuningError::OutOfRange {
                name: "slingshot_max_pull",
                value: self.slingshot_max_pull,
                range: "(0, inf)",
            });
        }
        if !(self.coin_spawn_interval > 0.0) {
            return Err(TuningError::OutOfRange {
                name: "coin_spawn_interval",
                value: self.coin_spawn_interval,
                range: "(0, inf)",
            });
        }
        Ok(())
    }
}
