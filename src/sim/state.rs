//! Game state and core simulation types
//!
//! The session (phase, level, score, stats, power-up) and every entity
//! collection live in one `GameState`, mutated only by the tick and by the
//! command handlers that run between ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Bug, Explosion, FinaleMissile, FloatingScore, Missile, Pager, Player};
use super::scoring::{KonamiDetector, SessionStats};
use super::timers::{Scheduler, TimerEvent, TimerId};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Wave cleared, waiting before the next level
    Transitioning,
    /// Periodic stats screen between waves
    Interstitial,
    /// Player hit, staged death animation running
    Exploding { stage: u8 },
    /// "Game over" text on screen
    GameOver,
    /// Fireworks wipe
    Finale,
    /// Final ring of explosions
    FinaleComplete,
    /// Waiting for the host to collect a name and submit the score
    HighScoreCapture,
}

impl GamePhase {
    /// Part of the death/finale sequence
    pub fn is_death_sequence(&self) -> bool {
        matches!(
            self,
            Self::Exploding { .. } | Self::GameOver | Self::Finale | Self::FinaleComplete
        )
    }
}

/// Notifications for hosts (audio, UI, leaderboard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    GameStarted,
    LevelStarted { level: u32, pagers: u32 },
    MissileFired { powered: bool },
    PagerDestroyed { id: u32, points: u64 },
    BugSpawned,
    BugSquashed { points: u64 },
    BugEscaped,
    WaveCleared { level: u32 },
    InterstitialShown { level: u32, stats: SessionStats },
    KonamiActivated,
    KonamiExpired,
    PlayerHit,
    GameOver { score: u64, level: u32 },
    FinaleStarted,
    FinaleCompleted,
    HighScoreCapture { score: u64, level: u32 },
    ReturnedToMenu,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    /// Current level (1-based once a game starts)
    pub level: u32,
    pub score: u64,
    pub stats: SessionStats,

    // === Power-up ===
    pub konami: KonamiDetector,
    pub konami_active: bool,
    pub konami_timer: Option<TimerId>,

    // === Entities ===
    pub player: Player,
    pub pagers: Vec<Pager>,
    pub missiles: Vec<Missile>,
    /// At most one bug at a time
    pub bug: Option<Bug>,
    pub bug_spawned_this_level: bool,
    pub bug_timer: Option<TimerId>,
    pub explosions: Vec<Explosion>,
    pub floating_scores: Vec<FloatingScore>,
    pub finale_missiles: Vec<FinaleMissile>,

    // === Sequencing ===
    /// Set once the player is hit; blocks any further death trigger
    pub death_triggered: bool,
    /// Pending timer that ends the current timed phase step
    pub phase_timer: Option<TimerId>,
    pub watchdog: Option<TimerId>,
    /// Seconds until held fire may shoot again
    pub fire_cooldown: f32,
    /// Session clock in seconds; frozen while paused
    pub clock: f64,
    pub paused: bool,

    pub rng: Pcg32,
    pub scheduler: Scheduler,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh session sitting on the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            level: 1,
            score: 0,
            stats: SessionStats::default(),
            konami: KonamiDetector::new(),
            konami_active: false,
            konami_timer: None,
            player: Player::default(),
            pagers: Vec::new(),
            missiles: Vec::new(),
            bug: None,
            bug_spawned_this_level: false,
            bug_timer: None,
            explosions: Vec::new(),
            floating_scores: Vec::new(),
            finale_missiles: Vec::new(),
            death_triggered: false,
            phase_timer: None,
            watchdog: None,
            fire_cooldown: 0.0,
            clock: 0.0,
            paused: false,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Change phase, logging and announcing the transition
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    /// Schedule a session timer relative to the current clock
    pub fn schedule(&mut self, delay: f32, event: TimerEvent) -> TimerId {
        self.scheduler.schedule(self.clock, delay, event)
    }

    /// Replace the phase-step timer with a new one
    pub fn schedule_phase_step(&mut self, delay: f32, event: TimerEvent) {
        if let Some(previous) = self.phase_timer.take() {
            self.scheduler.cancel(previous);
        }
        self.phase_timer = Some(self.schedule(delay, event));
    }

    /// Cancel every pending timer and wipe the session back to the menu.
    /// The RNG stream and clock carry on.
    pub fn reset_session(&mut self) {
        self.scheduler.cancel_all();
        self.level = 1;
        self.score = 0;
        self.stats = SessionStats::default();
        self.konami.clear();
        self.konami_active = false;
        self.konami_timer = None;
        self.player = Player::default();
        self.pagers.clear();
        self.missiles.clear();
        self.bug = None;
        self.bug_spawned_this_level = false;
        self.bug_timer = None;
        self.explosions.clear();
        self.floating_scores.clear();
        self.finale_missiles.clear();
        self.death_triggered = false;
        self.phase_timer = None;
        self.watchdog = None;
        self.fire_cooldown = 0.0;
        self.paused = false;
        self.set_phase(GamePhase::Menu);
    }

    /// Pagers that can still be shot or collide
    pub fn live_pagers(&self) -> impl Iterator<Item = &Pager> {
        self.pagers.iter().filter(|p| p.is_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_on_menu() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score, 0);
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(42);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_phase_emits_once() {
        let mut state = GameState::new(42);
        state.set_phase(GamePhase::Playing);
        state.set_phase(GamePhase::Playing);
        let changes = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PhaseChanged { .. }))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_reset_session_cancels_timers() {
        let mut state = GameState::new(42);
        state.set_phase(GamePhase::Playing);
        state.schedule(1.0, TimerEvent::TransitionDone);
        state.schedule_phase_step(2.0, TimerEvent::FinaleDone);
        state.score = 900;

        state.reset_session();
        assert!(state.scheduler.is_empty());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score, 0);
        assert!(state.phase_timer.is_none());
    }

    #[test]
    fn test_schedule_phase_step_replaces_previous() {
        let mut state = GameState::new(42);
        state.schedule_phase_step(1.0, TimerEvent::DeathStage(2));
        state.schedule_phase_step(1.0, TimerEvent::GameOverTextDone);
        assert_eq!(state.scheduler.len(), 1);
    }
}
