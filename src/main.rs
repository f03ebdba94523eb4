//! Slingshot Flight entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use slingshot_flight::persistence::web::LocalStorage;
    use slingshot_flight::platform::{Clock, FpsCounter, PerformanceClock};
    use slingshot_flight::sim::{
        FixedStepScheduler, GamePhase, GameState, Intent, Simulation, SpriteKind, tick,
    };
    use slingshot_flight::{Tuning, UpgradeKind};

    /// Simulation plus everything needed to draw it
    struct World {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        fps: u32,
    }

    impl Simulation for World {
        fn step(&mut self, h: f64) {
            tick(&mut self.state, h);
            for event in self.state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        fn render(&mut self, alpha: f64) {
            if let Err(e) = self.draw(alpha) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    impl World {
        fn draw(&self, alpha: f64) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let state = &self.state;
            let cam = &state.camera;
            let t = &state.tuning;

            ctx.set_fill_style_str("#87ceeb");
            ctx.fill_rect(0.0, 0.0, t.viewport_width, t.viewport_height);

            // Ground band
            let ground = cam.world_to_screen(DVec2::new(0.0, t.ground_y));
            ctx.set_fill_style_str("#4a7c3a");
            ctx.fill_rect(0.0, ground.y, t.viewport_width, t.viewport_height - ground.y);

            // Slingshot band while aiming
            if state.phase() == GamePhase::Aiming && state.slingshot.dragging {
                let anchor = cam.world_to_screen(state.slingshot.anchor);
                let pouch = cam.world_to_screen(state.slingshot.plane_position());
                ctx.set_stroke_style_str("#5c3a1e");
                ctx.set_line_width(4.0);
                ctx.begin_path();
                ctx.move_to(anchor.x, anchor.y);
                ctx.line_to(pouch.x, pouch.y);
                ctx.stroke();
            }

            for sprite in state.sprites() {
                let pos = cam.world_to_screen(sprite.interpolated(alpha));
                ctx.save();
                ctx.translate(pos.x, pos.y)?;
                ctx.rotate(sprite.rotation)?;
                match sprite.kind {
                    SpriteKind::Coin => {
                        // Spin reads as a squashed disc
                        let squash = sprite.rotation.cos().abs().max(0.15);
                        ctx.rotate(-sprite.rotation)?;
                        ctx.scale(squash, 1.0)?;
                        ctx.set_fill_style_str("#ffd700");
                        ctx.begin_path();
                        ctx.arc(0.0, 0.0, sprite.size.x / 2.0, 0.0, TAU)?;
                        ctx.fill();
                    }
                    SpriteKind::Plane => {
                        ctx.set_fill_style_str("#f5f5f5");
                        ctx.fill_rect(
                            -sprite.size.x / 2.0,
                            -sprite.size.y / 2.0,
                            sprite.size.x,
                            sprite.size.y,
                        );
                    }
                }
                ctx.restore();
            }

            self.draw_hud()
        }

        fn draw_hud(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let state = &self.state;
            ctx.set_fill_style_str("#1a1a1a");
            ctx.set_font("20px sans-serif");

            let distance = state.plane().map_or(0.0, |p| p.distance);
            ctx.fill_text(&format!("Distance: {:.0}m", distance), 20.0, 30.0)?;
            ctx.fill_text(&format!("Coins: {}", state.round.coins), 20.0, 55.0)?;
            ctx.fill_text(&format!("Bank: {}", state.shop.currency()), 20.0, 80.0)?;
            let fps_x = state.tuning.viewport_width - 110.0;
            ctx.fill_text(&format!("FPS: {}", self.fps), fps_x, 30.0)?;

            let prompt = match state.phase() {
                GamePhase::Idle => {
                    Some("Click or press Space to fly  |  1/2/3 buy upgrades".to_string())
                }
                GamePhase::Aiming => Some("Drag back from the slingshot and release".to_string()),
                GamePhase::InFlight => None,
                GamePhase::Resolved => state.last_summary.map(|s| {
                    format!(
                        "Flew {}m, {} coins. Click to fly again, Esc for menu",
                        s.distance, s.coins
                    )
                }),
            };
            if let Some(prompt) = prompt {
                ctx.fill_text(&prompt, 20.0, state.tuning.viewport_height / 2.0)?;
            }
            if matches!(state.phase(), GamePhase::Idle | GamePhase::Resolved) {
                let mut y = 120.0;
                for kind in UpgradeKind::ALL {
                    let info = state.shop.info(kind);
                    let cost = info.cost.map_or("MAX".to_string(), |c| c.to_string());
                    let line = format!(
                        "{} Lv{} ({}) - {}",
                        kind.label(),
                        info.level,
                        cost,
                        kind.description()
                    );
                    ctx.fill_text(&line, 20.0, y)?;
                    y += 25.0;
                }
            }
            Ok(())
        }
    }

    /// Game instance holding all driver state
    struct Game {
        world: World,
        scheduler: FixedStepScheduler,
        clock: PerformanceClock,
        fps: FpsCounter,
        canvas: HtmlCanvasElement,
        pitch_up: bool,
        pitch_down: bool,
    }

    impl Game {
        fn frame(&mut self, now: f64) {
            self.world.fps = self.fps.record(now);
            self.scheduler.frame(now, &mut self.world);
        }

        /// Pointer position in world units
        fn pointer_world(&self, event: &PointerEvent) -> DVec2 {
            let client_w = self.canvas.client_width().max(1) as f64;
            let client_h = self.canvas.client_height().max(1) as f64;
            let screen = DVec2::new(
                event.offset_x() as f64 * self.canvas.width() as f64 / client_w,
                event.offset_y() as f64 * self.canvas.height() as f64 / client_h,
            );
            self.world.state.camera.screen_to_world(screen)
        }

        fn push(&mut self, intent: Intent) {
            self.world.state.push_intent(intent);
        }

        fn set_pitch(&mut self, up: bool, down: bool) {
            if (up, down) != (self.pitch_up, self.pitch_down) {
                self.pitch_up = up;
                self.pitch_down = down;
                self.push(Intent::SetPitch { up, down });
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Slingshot Flight starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let tuning = load_tuning(&document);
        canvas.set_width(tuning.viewport_width as u32);
        canvas.set_height(tuning.viewport_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let scheduler = FixedStepScheduler::from_tuning(&tuning);
        let mut state = GameState::new(seed, tuning, Box::new(LocalStorage));
        state.set_phase_observer(|new, old| {
            log::debug!("Phase {} -> {}", old.as_str(), new.as_str());
        });
        log::info!("Game initialized with seed: {}", seed);

        let clock = PerformanceClock::new();
        let mut game = Game {
            world: World { state, ctx, fps: 0 },
            scheduler,
            clock,
            fps: FpsCounter::default(),
            canvas: canvas.clone(),
            pitch_up: false,
            pitch_down: false,
        };
        let now = game.clock.now();
        game.scheduler.start(now);
        let game = Rc::new(RefCell::new(game));

        setup_pointer_handlers(&canvas, game.clone());
        setup_keyboard(game.clone())?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);
        log::info!("Slingshot Flight running!");
        Ok(())
    }

    /// Optional `<script id="tuning" type="application/json">` overrides
    fn load_tuning(document: &web_sys::Document) -> Tuning {
        document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default()
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down: start a round from the menu, or grab the slingshot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                match g.world.state.phase() {
                    GamePhase::Idle | GamePhase::Resolved => g.push(Intent::NewRound),
                    GamePhase::Aiming => {
                        let point = g.pointer_world(&event);
                        g.push(Intent::StartAim(point));
                    }
                    GamePhase::InFlight => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.world.state.slingshot.dragging {
                    let point = g.pointer_world(&event);
                    g.push(Intent::DragAim(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // A cancelled touch lets go of the slingshot like a normal release
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().push(Intent::ReleaseAim);
            });
            for name in ["pointerup", "pointercancel"] {
                let _ = canvas
                    .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let (up, down) = (g.pitch_up, g.pitch_down);
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.set_pitch(true, down),
                    "ArrowDown" | "s" | "S" => g.set_pitch(up, true),
                    " " | "Enter" if !event.repeat() => g.push(Intent::NewRound),
                    "Escape" => g.push(Intent::ReturnToMenu),
                    key @ ("1" | "2" | "3") => {
                        let kind = match key {
                            "1" => UpgradeKind::Engine,
                            "2" => UpgradeKind::Wings,
                            _ => UpgradeKind::Fuselage,
                        };
                        g.push(Intent::PurchaseUpgrade(kind));
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let (up, down) = (g.pitch_up, g.pitch_down);
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.set_pitch(false, down),
                    "ArrowDown" | "s" | "S" => g.set_pitch(up, false),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Suspend the loop while the tab is hidden; resume without time debt
    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.scheduler.pause();
                log::info!("Auto-paused (tab hidden)");
            } else {
                let now = g.clock.now();
                g.scheduler.resume(now);
                log::info!("Resumed");
            }
        });
        document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(PerformanceClock::from_millis(time));
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Scripted rounds on a manual clock with uneven frame times

    use glam::DVec2;

    use slingshot_flight::persistence::{FileStore, MemoryStore, ProgressStore};
    use slingshot_flight::platform::{Clock, FpsCounter, ManualClock};
    use slingshot_flight::sim::{
        FixedStepScheduler, GameEvent, GamePhase, GameState, Intent, Simulation, tick,
    };
    use slingshot_flight::{Tuning, UpgradeKind};

    /// Display frame lengths cycled by the demo (seconds)
    const FRAME_PATTERN: [f64; 6] = [1.0 / 60.0, 1.0 / 30.0, 0.004, 1.0 / 144.0, 0.05, 1.0 / 60.0];

    /// Give up on a round that hasn't landed after this many frames
    const MAX_FRAMES_PER_ROUND: usize = 20_000;

    struct Headless {
        state: GameState,
        frames: u64,
        coin_events: u64,
    }

    impl Simulation for Headless {
        fn step(&mut self, h: f64) {
            tick(&mut self.state, h);
            for event in self.state.drain_events() {
                match event {
                    GameEvent::CoinCollected { .. } => self.coin_events += 1,
                    GameEvent::Landed { distance } => log::debug!("Landed after {:.1}", distance),
                    _ => {}
                }
            }
        }

        fn render(&mut self, _alpha: f64) {
            self.frames += 1;
        }
    }

    pub fn run(rounds: u32, tuning_path: Option<String>, save_dir: Option<String>) {
        let tuning = match tuning_path {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Tuning::from_json_or_default(&json),
                Err(e) => {
                    log::warn!("Can't read {}: {}", path, e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };
        let store: Box<dyn ProgressStore> = match save_dir {
            Some(dir) => {
                let store = FileStore::new(dir);
                log::info!("Saving progress under {}", store.dir().display());
                Box::new(store)
            }
            None => Box::new(MemoryStore::default()),
        };

        let seed = 0x5EED;
        let mut scheduler = FixedStepScheduler::from_tuning(&tuning);
        let mut game = Headless {
            state: GameState::new(seed, tuning, store),
            frames: 0,
            coin_events: 0,
        };
        game.state.set_phase_observer(|new, old| {
            log::debug!("Phase {} -> {}", old.as_str(), new.as_str());
        });

        let mut clock = ManualClock::new(0.0);
        let mut fps = FpsCounter::default();
        scheduler.start(clock.now());

        for round in 0..rounds {
            // Spend the bank between rounds, cheapest first
            for kind in UpgradeKind::ALL {
                if game.state.purchase_upgrade(kind) {
                    log::info!("Bought {}", kind.label());
                }
            }

            let anchor = game.state.slingshot.anchor;
            let pull = DVec2::new(-120.0, 50.0 + 10.0 * round as f64);
            game.state.push_intent(Intent::NewRound);
            game.state.push_intent(Intent::StartAim(anchor));
            game.state.push_intent(Intent::DragAim(anchor + pull));
            game.state.push_intent(Intent::ReleaseAim);

            let mut frame = 0;
            let mut climbing = false;
            while frame < MAX_FRAMES_PER_ROUND {
                let now = clock.advance(FRAME_PATTERN[frame % FRAME_PATTERN.len()]);
                fps.record(now);
                scheduler.frame(now, &mut game);
                frame += 1;

                match game.state.phase() {
                    GamePhase::Resolved => break,
                    GamePhase::InFlight => {
                        // Pull up for the first stretch of every second
                        let want = game.state.time_ticks % 60 < 15;
                        if want != climbing {
                            climbing = want;
                            game.state.push_intent(Intent::SetPitch {
                                up: want,
                                down: false,
                            });
                        }
                    }
                    _ => {}
                }
            }

            match game.state.last_summary.filter(|_| game.state.phase() == GamePhase::Resolved) {
                Some(s) => log::info!(
                    "Round {}: {}m, peak {:.0}, {} coins, bank {}",
                    round + 1,
                    s.distance,
                    s.peak_altitude,
                    s.coins,
                    s.total_currency
                ),
                None => log::warn!("Round {} did not land", round + 1),
            }
        }

        log::info!(
            "{} frames rendered, {} ticks, {} coins collected, ~{} fps",
            game.frames,
            game.state.time_ticks,
            game.coin_events,
            fps.fps()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slingshot Flight (native) starting...");
    log::info!("Running headless rounds - build for wasm32 to play in a browser");

    // slingshot-flight [rounds] [tuning.json]; SLINGSHOT_SAVE_DIR enables file saves
    let mut args = std::env::args().skip(1);
    let rounds = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let tuning_path = args.next();
    let save_dir = std::env::var("SLINGSHOT_SAVE_DIR").ok();

    headless::run(rounds, tuning_path, save_dir);
}
