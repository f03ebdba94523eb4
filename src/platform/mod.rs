//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clock readings for the scheduler)
//! - Frame statistics for the HUD
//!
//! Storage lives in [`crate::persistence`].

pub mod time;

pub use time::{Clock, FpsCounter, ManualClock};

#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;

#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
