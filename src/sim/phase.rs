//! Top-level game phase and its transition table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu, before any round
    #[default]
    Idle,
    /// Plane sits in the slingshot; physics suspended
    Aiming,
    /// Physics, camera and collection all running
    InFlight,
    /// Plane landed, round totals final
    Resolved,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Aiming => "Aiming",
            GamePhase::InFlight => "InFlight",
            GamePhase::Resolved => "Resolved",
        }
    }

    /// The transition table. Anything not listed is rejected.
    pub fn can_transition_to(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Idle, Aiming)
                | (Aiming, Idle)
                | (Aiming, InFlight)
                | (InFlight, Resolved)
                | (Resolved, Aiming)
                | (Resolved, Idle)
        )
    }
}

/// Observer fired on every accepted transition with `(new, old)`
pub type PhaseObserver = Box<dyn FnMut(GamePhase, GamePhase)>;

/// Holds the current phase and enforces the transition table
#[derive(Default)]
pub struct PhaseMachine {
    phase: GamePhase,
    observer: Option<PhaseObserver>,
}

impl fmt::Debug for PhaseMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("phase", &self.phase)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl PhaseMachine {
    pub fn new(phase: GamePhase) -> Self {
        Self {
            phase,
            observer: None,
        }
    }

    #[inline]
    pub fn current(&self) -> GamePhase {
        self.phase
    }

    pub fn set_observer(&mut self, observer: PhaseObserver) {
        self.observer = Some(observer);
    }

    /// Move to `to` if the table allows it. Returns the previous phase.
    /// Rejected transitions leave the phase unchanged.
    pub fn transition(&mut self, to: GamePhase) -> Result<GamePhase, PhaseError> {
        let from = self.phase;
        if !from.can_transition_to(to) {
            log::warn!("Rejected phase transition {} -> {}", from.as_str(), to.as_str());
            return Err(PhaseError::InvalidTransition { from, to });
        }

        self.phase = to;
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        if let Some(observer) = self.observer.as_mut() {
            observer(to, from);
        }
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ALL: [GamePhase; 4] = [
        GamePhase::Idle,
        GamePhase::Aiming,
        GamePhase::InFlight,
        GamePhase::Resolved,
    ];

    #[test]
    fn test_round_cycle() {
        let mut machine = PhaseMachine::default();
        assert_eq!(machine.current(), GamePhase::Idle);
        assert_eq!(machine.transition(GamePhase::Aiming), Ok(GamePhase::Idle));
        assert_eq!(machine.transition(GamePhase::InFlight), Ok(GamePhase::Aiming));
        assert_eq!(machine.transition(GamePhase::Resolved), Ok(GamePhase::InFlight));
        assert_eq!(machine.transition(GamePhase::Aiming), Ok(GamePhase::Resolved));
    }

    #[test]
    fn test_resolved_to_in_flight_rejected() {
        let mut machine = PhaseMachine::new(GamePhase::Resolved);
        let err = machine.transition(GamePhase::InFlight).unwrap_err();
        assert_eq!(
            err,
            PhaseError::InvalidTransition {
                from: GamePhase::Resolved,
                to: GamePhase::InFlight
            }
        );
        assert_eq!(machine.current(), GamePhase::Resolved);
    }

    #[test]
    fn test_self_transitions_rejected() {
        for phase in ALL {
            assert!(!phase.can_transition_to(phase));
        }
    }

    #[test]
    fn test_flight_only_ends_in_resolved() {
        for to in ALL {
            assert_eq!(
                GamePhase::InFlight.can_transition_to(to),
                to == GamePhase::Resolved
            );
        }
    }

    #[test]
    fn test_observer_sees_accepted_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut machine = PhaseMachine::default();
        let sink = seen.clone();
        machine.set_observer(Box::new(move |new, old| sink.borrow_mut().push((new, old))));

        machine.transition(GamePhase::Aiming).unwrap();
        assert!(machine.transition(GamePhase::Resolved).is_err());
        machine.transition(GamePhase::InFlight).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (GamePhase::Aiming, GamePhase::Idle),
                (GamePhase::InFlight, GamePhase::Aiming)
            ]
        );
    }
}
