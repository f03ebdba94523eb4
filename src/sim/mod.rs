//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod coin;
pub mod collision;
pub mod entity;
pub mod flight;
pub mod input;
pub mod phase;
pub mod pool;
pub mod scheduler;
pub mod slingshot;
pub mod state;
pub mod tick;

pub use camera::FollowCamera;
pub use coin::Coin;
pub use collision::{coin_hits_plane, collect_coins, try_collect};
pub use entity::{Body, Entity, Sprite, SpriteKind};
pub use flight::FlyingBody;
pub use input::{Intent, IntentQueue, PitchInput};
pub use phase::{GamePhase, PhaseMachine, PhaseObserver};
pub use pool::{EntityPool, Handle};
pub use scheduler::{FixedStepScheduler, FrameReport, Simulation};
pub use slingshot::Slingshot;
pub use state::{GameEvent, GameState, RoundStats, RoundSummary};
pub use tick::tick;
