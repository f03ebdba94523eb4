//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one step of `h` seconds: pending
//! intents are applied first, then the active phase's update runs, then the
//! coin animation.

use super::collision::collect_coins;
use super::entity::Entity;
use super::input::Intent;
use super::phase::GamePhase;
use super::state::{GameEvent, GameState};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, h: f64) {
    state.time_ticks += 1;

    while let Some(intent) = state.intents.pop() {
        apply_intent(state, intent);
    }

    match state.phase() {
        GamePhase::Aiming => {
            let pos = state.slingshot.plane_position();
            if let Some(plane) = state.plane_mut() {
                plane.body.place(pos);
            }
        }
        GamePhase::InFlight => step_flight(state, h),
        GamePhase::Idle | GamePhase::Resolved => {}
    }

    for (_, coin) in state.coins.iter_mut() {
        coin.step(h, &state.tuning);
    }
}

fn apply_intent(state: &mut GameState, intent: Intent) {
    let phase = state.phase();
    let result = match intent {
        Intent::NewRound => state.transition(GamePhase::Aiming),
        Intent::ReturnToMenu => state.transition(GamePhase::Idle),
        Intent::StartAim(point) if phase == GamePhase::Aiming => {
            state.slingshot.start_drag(point);
            Ok(())
        }
        Intent::DragAim(point) if phase == GamePhase::Aiming => {
            state.slingshot.drag(point);
            Ok(())
        }
        Intent::ReleaseAim if phase == GamePhase::Aiming => match state.slingshot.release() {
            Some(velocity) => state.launch(velocity),
            None => {
                log::debug!("Release too weak, still aiming");
                Ok(())
            }
        },
        Intent::SetPitch { up, down } => {
            state.pitch.up = up;
            state.pitch.down = down;
            Ok(())
        }
        Intent::PurchaseUpgrade(kind) => {
            if !state.purchase_upgrade(kind) {
                log::debug!("Can't buy {} in {}", kind.label(), phase.as_str());
            }
            Ok(())
        }
        Intent::StartAim(_) | Intent::DragAim(_) | Intent::ReleaseAim => {
            log::debug!("Ignoring {:?} in {}", intent, phase.as_str());
            Ok(())
        }
    };

    if let Err(e) = result {
        log::debug!("Intent {:?} rejected: {}", intent, e);
    }
}

fn step_flight(state: &mut GameState, h: f64) {
    let Some(handle) = state.plane_handle() else {
        return;
    };
    let Some(plane) = state.planes.get_mut(handle) else {
        return;
    };

    if state.pitch.up {
        plane.pitch_up(h, &state.tuning);
    }
    if state.pitch.down {
        plane.pitch_down(h, &state.tuning);
    }
    plane.step(h, &state.tuning);

    let before = state.events.len();
    state.round.coins += collect_coins(&mut state.coins, plane, &mut state.events);
    state.round.coins_collected += (state.events.len() - before) as u32;

    state.camera.update(plane.body.pos);

    let x = plane.body.pos.x;
    let landed = plane.landed;
    let distance = plane.distance;

    state.spawn_coins_ahead(x);
    state.recycle_coins();

    if landed {
        state.events.push(GameEvent::Landed { distance });
        if let Err(e) = state.transition(GamePhase::Resolved) {
            log::warn!("Could not resolve round: {}", e);
        }
    }
}
