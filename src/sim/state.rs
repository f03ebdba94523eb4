//! Simulation context
//!
//! [`GameState`] owns everything a round needs: pools, camera, slingshot,
//! phase machine, intent queue, shop and the progress store. The driver owns
//! the `GameState` and threads it through the scheduler; nothing is global.

use std::fmt;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::FollowCamera;
use super::coin::Coin;
use super::entity::{Entity, Sprite};
use super::flight::FlyingBody;
use super::input::{Intent, IntentQueue, PitchInput};
use super::phase::{GamePhase, PhaseMachine};
use super::pool::{EntityPool, Handle};
use super::slingshot::Slingshot;
use crate::error::PhaseError;
use crate::persistence::{self, MemoryStore, ProgressStore};
use crate::tuning::Tuning;
use crate::upgrades::{UpgradeKind, UpgradeShop};

/// Something the driver may want to react to (sound, HUD pop, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Launched { velocity: DVec2 },
    CoinCollected { value: u64, pos: DVec2 },
    Landed { distance: f64 },
    RoundResolved(RoundSummary),
}

/// Running totals for the current round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    /// Coin value collected this round
    pub coins: u64,
    pub coins_collected: u32,
}

/// Final numbers of a resolved round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Whole world units flown
    pub distance: u64,
    pub peak_altitude: f64,
    pub coins: u64,
    /// Balance after this round's coins were banked
    pub total_currency: u64,
}

pub struct GameState {
    pub tuning: Tuning,
    /// Seed for coin placement
    pub seed: u64,
    rng: Pcg32,
    phases: PhaseMachine,
    pub planes: EntityPool<FlyingBody>,
    plane: Option<Handle>,
    pub coins: EntityPool<Coin>,
    pub camera: FollowCamera,
    pub slingshot: Slingshot,
    pub intents: IntentQueue,
    /// Held pitch keys
    pub pitch: PitchInput,
    pub round: RoundStats,
    pub last_summary: Option<RoundSummary>,
    pub shop: UpgradeShop,
    store: Box<dyn ProgressStore>,
    /// Velocity handed to the plane on entering InFlight
    pending_launch: Option<DVec2>,
    /// x of the furthest coin placed so far
    next_coin_x: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the driver last drained them
    pub events: Vec<GameEvent>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("seed", &self.seed)
            .field("phase", &self.phases.current())
            .field("time_ticks", &self.time_ticks)
            .field("plane", &self.plane())
            .field("coins_in_use", &self.coins.in_use_count())
            .field("camera", &self.camera)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Create a context in the Idle phase with progress loaded from `store`
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn ProgressStore>) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            }
        };
        let progress = persistence::load_or_default(store.as_ref());
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phases: PhaseMachine::new(GamePhase::Idle),
            planes: EntityPool::with_capacity(1),
            plane: None,
            coins: EntityPool::with_capacity(tuning.coin_initial_count),
            camera: FollowCamera::new(&tuning),
            slingshot: Slingshot::new(&tuning),
            intents: IntentQueue::default(),
            pitch: PitchInput::default(),
            round: RoundStats::default(),
            last_summary: None,
            shop: UpgradeShop::new(progress),
            store,
            pending_launch: None,
            next_coin_x: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        };

        // Lay out the first round so the menu has something to show
        state.reset_round();
        state
    }

    /// Default tuning, in-memory progress
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), Box::new(MemoryStore::default()))
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phases.current()
    }

    /// Observer called with `(new, old)` on every accepted phase change
    pub fn set_phase_observer(&mut self, observer: impl FnMut(GamePhase, GamePhase) + 'static) {
        self.phases.set_observer(Box::new(observer));
    }

    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    #[inline]
    pub fn plane_handle(&self) -> Option<Handle> {
        self.plane
    }

    pub fn plane(&self) -> Option<&FlyingBody> {
        self.plane.and_then(|h| self.planes.get(h))
    }

    pub fn plane_mut(&mut self) -> Option<&mut FlyingBody> {
        self.plane.and_then(|h| self.planes.get_mut(h))
    }

    /// Change phase and run the entry actions of the new phase
    pub fn transition(&mut self, to: GamePhase) -> Result<(), PhaseError> {
        self.phases.transition(to)?;
        match to {
            GamePhase::Idle => {
                self.slingshot.reset();
                self.pending_launch = None;
            }
            GamePhase::Aiming => self.reset_round(),
            GamePhase::InFlight => self.begin_flight(),
            GamePhase::Resolved => self.resolve_round(),
        }
        Ok(())
    }

    /// Fire the plane with `velocity` (before the engine multiplier)
    pub fn launch(&mut self, velocity: DVec2) -> Result<(), PhaseError> {
        self.pending_launch = Some(velocity);
        let result = self.transition(GamePhase::InFlight);
        self.pending_launch = None;
        result
    }

    /// Fresh plane, camera, coin field and counters. Nothing from the
    /// previous round survives.
    fn reset_round(&mut self) {
        self.planes.release_all();
        self.coins.release_all();
        self.camera.reset();
        self.slingshot.reset();
        self.pitch = PitchInput::default();
        self.pending_launch = None;
        self.round = RoundStats::default();

        let handle = self.planes.acquire();
        let anchor = self.slingshot.plane_position();
        if let Some(plane) = self.planes.get_mut(handle) {
            plane.prepare(anchor, self.shop.multipliers(), &self.tuning);
        }
        self.plane = Some(handle);

        self.next_coin_x = self.tuning.slingshot_x + self.tuning.coin_field_start;
        for _ in 0..self.tuning.coin_initial_count {
            self.spawn_coin();
        }
    }

    fn begin_flight(&mut self) {
        let velocity = self.pending_launch.take().unwrap_or(DVec2::ZERO);
        let Some(handle) = self.plane else {
            return;
        };
        if let Some(plane) = self.planes.get_mut(handle) {
            plane.launch(velocity);
            self.camera.snap_to(plane.body.pos);
            log::info!(
                "Launched at ({:.0}, {:.0}), speed {:.0}",
                plane.vel.x,
                plane.vel.y,
                plane.speed()
            );
        }
        self.events.push(GameEvent::Launched { velocity });
    }

    fn resolve_round(&mut self) {
        let (distance, peak_altitude) = self
            .plane()
            .map(|p| (p.distance.floor() as u64, p.peak_altitude))
            .unwrap_or((0, 0.0));

        self.shop.add_currency(self.round.coins);
        persistence::save_or_warn(self.store.as_mut(), self.shop.progress());

        let summary = RoundSummary {
            distance,
            peak_altitude,
            coins: self.round.coins,
            total_currency: self.shop.currency(),
        };
        log::info!(
            "Round over: {}m, {} coins ({} total)",
            summary.distance,
            summary.coins,
            summary.total_currency
        );
        self.last_summary = Some(summary);
        self.events.push(GameEvent::RoundResolved(summary));
    }

    /// Place one coin past the current field edge
    fn spawn_coin(&mut self) {
        let t = &self.tuning;
        let x = self.next_coin_x + t.coin_spawn_interval * (0.5 + self.rng.random::<f64>());
        let y = t.ground_y - t.coin_min_altitude - self.rng.random::<f64>() * t.coin_altitude_range;
        let bob_phase = self.rng.random::<f64>() * std::f64::consts::TAU;

        let handle = self.coins.acquire();
        if let Some(coin) = self.coins.get_mut(handle) {
            coin.spawn(DVec2::new(x, y), bob_phase, &self.tuning);
        }
        self.next_coin_x = x;
    }

    /// Keep the coin field two viewports ahead of `x`
    pub(crate) fn spawn_coins_ahead(&mut self, x: f64) {
        let horizon = x + self.tuning.viewport_width * 2.0;
        while self.next_coin_x < horizon {
            self.spawn_coin();
        }
    }

    /// Return collected coins and coins left behind the camera to the pool
    pub(crate) fn recycle_coins(&mut self) -> usize {
        let left = self.camera.pos.x - self.camera.cull_margin;
        self.coins
            .release_where(|c| c.collected || c.body.pos.x + c.radius < left)
    }

    /// Buy an upgrade between rounds and persist the result
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if !matches!(self.phase(), GamePhase::Idle | GamePhase::Resolved) {
            return false;
        }
        if !self.shop.upgrade(kind) {
            return false;
        }
        persistence::save_or_warn(self.store.as_mut(), self.shop.progress());
        true
    }

    /// Render data for everything worth drawing this frame
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        let camera = &self.camera;
        let coins = self
            .coins
            .iter()
            .map(|(_, c)| c)
            .filter(|c| c.is_active() && c.body.visible)
            .filter(move |c| camera.is_visible(c.body.pos, c.body.size))
            .map(|c| c.sprite());
        let plane = self
            .plane()
            .filter(|p| p.body.visible)
            .map(|p| p.sprite());
        coins.chain(plane)
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_with_round_laid_out() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase(), GamePhase::Idle);
        let plane = state.plane().unwrap();
        assert_eq!(plane.body.pos, state.slingshot.anchor);
        assert!(!plane.launched);
        assert_eq!(state.coins.in_use_count(), state.tuning.coin_initial_count);
    }

    #[test]
    fn test_invalid_tuning_replaced_by_defaults() {
        let tuning = Tuning {
            coin_spawn_interval: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(1, tuning, Box::new(MemoryStore::default()));
        assert_eq!(state.tuning, Tuning::default());

        // Terminates with a usable spacing
        state.spawn_coins_ahead(10_000.0);
        assert!(state.coins.in_use_count() > state.tuning.coin_initial_count);
    }

    #[test]
    fn test_coin_field_is_seeded() {
        let a = GameState::with_seed(42);
        let b = GameState::with_seed(42);
        let c = GameState::with_seed(43);
        let pos = |s: &GameState| s.coins.iter().map(|(_, c)| c.body.pos).collect::<Vec<_>>();
        assert_eq!(pos(&a), pos(&b));
        assert_ne!(pos(&a), pos(&c));
    }

    #[test]
    fn test_coins_spaced_and_above_ground() {
        let state = GameState::with_seed(7);
        let t = &state.tuning;
        let mut last_x = t.slingshot_x + t.coin_field_start;
        for (_, coin) in state.coins.iter() {
            let gap = coin.body.pos.x - last_x;
            assert!(gap >= t.coin_spawn_interval * 0.5 && gap < t.coin_spawn_interval * 1.5);
            assert!(coin.body.pos.y <= t.ground_y - t.coin_min_altitude);
            assert!(coin.body.pos.y > t.ground_y - t.coin_min_altitude - t.coin_altitude_range);
            last_x = coin.body.pos.x;
        }
    }

    #[test]
    fn test_launch_requires_aiming() {
        let mut state = GameState::with_seed(1);
        assert!(state.launch(DVec2::new(500.0, -300.0)).is_err());
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(!state.plane().unwrap().launched);
    }

    #[test]
    fn test_entering_flight_snaps_camera() {
        let mut state = GameState::with_seed(1);
        state.transition(GamePhase::Aiming).unwrap();
        state.plane_mut().unwrap().body.place(DVec2::new(900.0, 200.0));
        state.launch(DVec2::new(500.0, -300.0)).unwrap();

        assert_eq!(state.phase(), GamePhase::InFlight);
        assert_eq!(state.camera.pos, DVec2::new(600.0, 0.0));
        let plane = state.plane().unwrap();
        assert!(plane.launched && plane.flying);
        assert!(matches!(
            state.drain_events().next(),
            Some(GameEvent::Launched { .. })
        ));
    }

    #[test]
    fn test_upgrades_only_between_rounds() {
        let mut state = GameState::with_seed(1);
        state.shop.add_currency(1_000);
        state.transition(GamePhase::Aiming).unwrap();
        assert!(!state.purchase_upgrade(UpgradeKind::Engine));
        state.transition(GamePhase::Idle).unwrap();
        assert!(state.purchase_upgrade(UpgradeKind::Engine));
        assert_eq!(state.shop.level(UpgradeKind::Engine), 2);

        // New round picks up the multiplier
        state.transition(GamePhase::Aiming).unwrap();
        assert!((state.plane().unwrap().multipliers.engine - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_recycle_releases_coins_behind_camera() {
        let mut state = GameState::with_seed(3);
        let before = state.coins.in_use_count();
        state.camera.pos.x = 1_000_000.0;
        assert_eq!(state.recycle_coins(), before);
        assert_eq!(state.coins.in_use_count(), 0);
        assert_eq!(state.coins.available_count(), state.coins.total_count());
    }

    #[test]
    fn test_sprites_cull_offscreen_coins() {
        let state = GameState::with_seed(5);
        let sprites: Vec<_> = state.sprites().collect();
        // Plane is always included
        assert!(sprites.iter().any(|s| s.kind == crate::sim::SpriteKind::Plane));
        let visible_coins = sprites.len() - 1;
        assert!(visible_coins < state.coins.in_use_count());
    }
}
