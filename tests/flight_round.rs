//! Headless rounds driven through the fixed-step scheduler.
//!
//! Covered scenarios:
//! 1. A full round from the menu to Resolved banks and persists the coins.
//! 2. The outcome of a round doesn't depend on how steps are grouped into frames.
//! 3. Resolved can't go straight back to InFlight.
//! 4. A new round starts from a clean slate.
//! 5. Corrupt saved progress is replaced by defaults.
//! 6. Pause/resume and the frame-drop panic keep the accumulator bounded.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::DVec2;
use slingshot_flight::consts::FIXED_TIMESTEP;
use slingshot_flight::persistence::{COINS_KEY, KeyValueStore, LEVELS_KEY};
use slingshot_flight::sim::{
    FixedStepScheduler, GameEvent, GamePhase, GameState, Intent, Simulation, tick,
};
use slingshot_flight::{PersistResult, PhaseError, Tuning};

const H: f64 = FIXED_TIMESTEP;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Key-value store whose contents outlive the `GameState` that owns it
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<BTreeMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Simulation adapter that also records every event
struct Runner {
    state: GameState,
    events: Vec<GameEvent>,
    renders: Vec<f64>,
}

impl Runner {
    fn new(state: GameState) -> Self {
        Self {
            state,
            events: Vec::new(),
            renders: Vec::new(),
        }
    }
}

impl Simulation for Runner {
    fn step(&mut self, h: f64) {
        tick(&mut self.state, h);
        self.events.extend(self.state.drain_events());
    }

    fn render(&mut self, alpha: f64) {
        self.renders.push(alpha);
    }
}

fn queue_launch(state: &mut GameState) {
    let anchor = state.slingshot.anchor;
    state.push_intent(Intent::NewRound);
    state.push_intent(Intent::StartAim(anchor));
    state.push_intent(Intent::DragAim(anchor + DVec2::new(-130.0, 45.0)));
    state.push_intent(Intent::ReleaseAim);
}

/// Advance with the given frame lengths (cycled) until the round resolves
fn play_until_resolved(runner: &mut Runner, frames: &[f64]) {
    let mut scheduler = FixedStepScheduler::from_tuning(&runner.state.tuning);
    scheduler.start(0.0);
    for i in 0..50_000 {
        scheduler.advance(frames[i % frames.len()], runner);
        if runner.state.phase() == GamePhase::Resolved {
            return;
        }
    }
    panic!("round never resolved");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn full_round_banks_and_persists_coins() {
    let store = SharedStore::default();
    let mut runner = Runner::new(GameState::new(11, Tuning::default(), Box::new(store.clone())));
    assert_eq!(runner.state.phase(), GamePhase::Idle);

    queue_launch(&mut runner.state);
    play_until_resolved(&mut runner, &[H]);

    let summary = runner.state.last_summary.expect("summary after landing");
    let plane = runner.state.plane().unwrap();
    assert!(plane.landed);
    assert!(summary.distance > 0);
    assert_eq!(summary.distance, plane.distance.floor() as u64);

    let collected: u64 = runner
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CoinCollected { value, .. } => Some(*value),
            _ => None,
        })
        .sum();
    assert_eq!(summary.coins, collected);
    assert_eq!(summary.total_currency, collected);
    assert!(matches!(runner.events.first(), Some(GameEvent::Launched { .. })));
    assert!(matches!(runner.events.last(), Some(GameEvent::RoundResolved(_))));

    // Saved on resolve, under the localStorage keys
    let saved = store.0.borrow().clone();
    assert_eq!(saved.get(COINS_KEY).map(String::as_str), Some(collected.to_string().as_str()));
    assert!(saved.contains_key(LEVELS_KEY));

    // A new session picks the balance back up
    let reloaded = GameState::new(12, Tuning::default(), Box::new(store));
    assert_eq!(reloaded.shop.currency(), collected);
}

#[test]
fn frame_grouping_does_not_change_outcome() {
    let outcome = |frames: &[f64]| {
        let mut runner = Runner::new(GameState::with_seed(77));
        queue_launch(&mut runner.state);
        play_until_resolved(&mut runner, frames);
        let plane = runner.state.plane().unwrap().clone();
        (
            plane.body.pos,
            plane.distance,
            plane.peak_altitude,
            runner.state.round,
            runner.state.last_summary,
            runner.state.camera.pos,
        )
    };

    let one_step_frames = outcome(&[H]);
    let triple_step_frames = outcome(&[3.0 * H]);
    let uneven_frames = outcome(&[0.004, 1.0 / 30.0, 1.0 / 144.0, 0.05, 0.011]);

    assert_eq!(one_step_frames, triple_step_frames);
    assert_eq!(one_step_frames, uneven_frames);

    // And the same as calling tick directly
    let mut state = GameState::with_seed(77);
    queue_launch(&mut state);
    while state.phase() != GamePhase::Resolved {
        tick(&mut state, H);
    }
    assert_eq!(state.plane().unwrap().body.pos, one_step_frames.0);
}

#[test]
fn resolved_rejects_direct_relaunch() {
    let mut runner = Runner::new(GameState::with_seed(3));
    queue_launch(&mut runner.state);
    play_until_resolved(&mut runner, &[H]);

    let err = runner.state.transition(GamePhase::InFlight).unwrap_err();
    assert_eq!(
        err,
        PhaseError::InvalidTransition {
            from: GamePhase::Resolved,
            to: GamePhase::InFlight,
        }
    );
    assert_eq!(runner.state.phase(), GamePhase::Resolved);

    // Launch requests are rejected the same way
    assert!(runner.state.launch(DVec2::new(400.0, -200.0)).is_err());
    assert!(runner.state.plane().unwrap().landed);
}

#[test]
fn new_round_starts_clean() {
    let mut runner = Runner::new(GameState::with_seed(5));
    queue_launch(&mut runner.state);
    play_until_resolved(&mut runner, &[H]);
    assert!(runner.state.camera.pos.x > 0.0);

    runner.state.push_intent(Intent::NewRound);
    tick(&mut runner.state, H);

    let state = &runner.state;
    assert_eq!(state.phase(), GamePhase::Aiming);
    let plane = state.plane().unwrap();
    assert!(!plane.launched && !plane.flying && !plane.landed);
    assert_eq!(plane.body.pos, state.slingshot.anchor);
    assert_eq!(plane.vel, DVec2::ZERO);
    assert_eq!(plane.distance, 0.0);
    assert_eq!(state.round.coins, 0);
    assert_eq!(state.camera.pos, DVec2::ZERO);
    assert_eq!(state.camera.min_x, 0.0);
    assert_eq!(state.planes.in_use_count(), 1);
    assert_eq!(state.coins.in_use_count(), state.tuning.coin_initial_count);
    assert!(state.coins.iter().all(|(_, c)| !c.collected));
}

#[test]
fn corrupt_progress_falls_back_to_defaults() {
    let store = SharedStore::default();
    store.0.borrow_mut().insert(COINS_KEY.into(), "not a number".into());
    store.0.borrow_mut().insert(LEVELS_KEY.into(), r#"{"engine": 4}"#.into());

    let state = GameState::new(1, Tuning::default(), Box::new(store));
    assert_eq!(state.shop.currency(), 0);
    assert_eq!(state.shop.level(slingshot_flight::UpgradeKind::Engine), 1);
}

#[test]
fn pause_and_panic_keep_accumulator_bounded() {
    let mut runner = Runner::new(GameState::with_seed(9));
    let mut scheduler = FixedStepScheduler::from_tuning(&runner.state.tuning);
    scheduler.start(0.0);

    // Frame-drop panic: the backlog is discarded
    let report = scheduler.frame(100.0, &mut runner).unwrap();
    assert!(report.panicked);
    assert_eq!(report.steps, scheduler.max_steps());
    assert_eq!(scheduler.accumulator(), H);
    assert_eq!(report.alpha, 1.0);

    // Paused: rendering continues with alpha 0, no steps
    scheduler.pause();
    let ticks = runner.state.time_ticks;
    let report = scheduler.frame(160.0, &mut runner).unwrap();
    assert_eq!(report.steps, 0);
    assert_eq!(runner.renders.last(), Some(&0.0));
    assert_eq!(runner.state.time_ticks, ticks);

    // Resuming doesn't replay the paused time
    scheduler.resume(200.0);
    assert_eq!(scheduler.accumulator(), 0.0);
    let report = scheduler.frame(200.0 + H * 0.5, &mut runner).unwrap();
    assert_eq!(report.steps, 0);
    assert!(report.alpha < 1.0);
}
