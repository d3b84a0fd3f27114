//! Score values, session statistics and the Konami power-up

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use super::timers::TimerEvent;
use crate::tuning::Tuning;

/// Directional input token fed to the Konami detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// up, up, down, down, left, right, left, right
pub const KONAMI_SEQUENCE: [Direction; 8] = [
    Direction::Up,
    Direction::Up,
    Direction::Down,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Left,
    Direction::Right,
];

/// Rolling buffer of the most recent directional inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KonamiDetector {
    buffer: VecDeque<Direction>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(KONAMI_SEQUENCE.len()),
        }
    }

    /// Record a token. Returns true (and clears the buffer) when the last
    /// eight tokens spell the sequence.
    pub fn push(&mut self, dir: Direction) -> bool {
        if self.buffer.len() == KONAMI_SEQUENCE.len() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(dir);

        if self.buffer.iter().eq(KONAMI_SEQUENCE.iter()) {
            self.buffer.clear();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Cumulative per-session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub pagers_killed: u32,
    pub bugs_killed: u32,
}

impl SessionStats {
    pub fn kills(&self) -> u32 {
        self.pagers_killed + self.bugs_killed
    }

    /// Kills per shot as a percentage; 0 when nothing was fired
    pub fn hit_rate(&self) -> f64 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        self.kills() as f64 / self.shots_fired as f64 * 100.0
    }
}

/// Points for a pager kill, doubled while the power-up is active
pub fn pager_points(tuning: &Tuning, konami_active: bool) -> u64 {
    if konami_active {
        tuning.pager_points * 2
    } else {
        tuning.pager_points
    }
}

/// Feed a directional token; activates the power-up on a full match.
/// Ignored outside `Playing`.
pub fn handle_directional_input(state: &mut GameState, tuning: &Tuning, dir: Direction) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if state.konami.push(dir) {
        activate_konami(state, tuning);
    }
}

/// Start (or restart) the power-up window
pub fn activate_konami(state: &mut GameState, tuning: &Tuning) {
    if let Some(previous) = state.konami_timer.take() {
        state.scheduler.cancel(previous);
    }
    state.konami_active = true;
    state.konami_timer = Some(state.schedule(tuning.konami_duration, TimerEvent::KonamiExpire));
    state.events.push(GameEvent::KonamiActivated);
    log::info!("Konami power-up active for {:.0}s", tuning.konami_duration);
}

/// Timer handler: end the power-up window
pub fn expire_konami(state: &mut GameState) {
    state.konami_timer = None;
    if state.konami_active {
        state.konami_active = false;
        state.events.push(GameEvent::KonamiExpired);
        log::info!("Konami power-up expired");
    }
}
