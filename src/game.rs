//! `GameCore` - the boundary hosts talk to
//!
//! A host (windowed, web, terminal, test) owns one `GameCore`, forwards
//! input through the setters in `crate::input`, calls `tick` at a fixed
//! step (see `crate::driver`), then reads a `Snapshot` and drains events
//! and audio commands.

use crate::audio::{AudioChannel, AudioCommand, Track};
use crate::error::Error;
use crate::highscores::{HighScoreEntry, HighScoreStore};
use crate::settings::Settings;
use crate::sim::director;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Held inputs between ticks
#[derive(Debug, Clone, Default)]
pub(crate) struct Intent {
    pub thrusting: bool,
    pub rotate: f32,
    pub shooting: bool,
    /// Fire pressed since the last simulated tick
    pub fire_pending: bool,
}

pub struct GameCore {
    pub(crate) state: GameState,
    pub(crate) tuning: Tuning,
    pub(crate) settings: Settings,
    pub(crate) intent: Intent,
    audio: AudioChannel,
    autopilot: bool,
    /// Music silenced by `pause`, restored by `resume`
    resume_track: Option<Track>,
    events: Vec<GameEvent>,
}

impl GameCore {
    /// Build a core for `seed`, rejecting tuning that fails `Tuning::validate`
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, Error> {
        tuning.validate()?;
        let mut audio = AudioChannel::new(settings.music_muted);
        audio.play(Track::Intro);
        Ok(Self {
            state: GameState::new(seed),
            tuning,
            settings,
            intent: Intent::default(),
            audio,
            autopilot: false,
            resume_track: None,
            events: Vec::new(),
        })
    }

    /// Seed the session from OS entropy
    pub fn with_entropy(tuning: Tuning, settings: Settings) -> Result<Self, Error> {
        Self::new(rand::random(), tuning, settings)
    }

    /// Start a new game from any phase
    pub fn start_game(&mut self) {
        self.intent = Intent::default();
        self.resume_track = None;
        director::start_game(&mut self.state, &self.tuning);
        self.route_events();
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let input = TickInput {
            thrusting: self.intent.thrusting,
            rotate: self.intent.rotate,
            shooting: self.intent.shooting,
            fire: self.intent.fire_pending,
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input, &self.tuning, dt);
        if !self.state.paused {
            self.intent.fire_pending = false;
        }
        self.route_events();
    }

    /// Freeze the session clock and silence music; pending timers stay
    /// pending
    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Menu && !self.state.paused {
            self.state.paused = true;
            self.resume_track = self.audio.current();
            self.audio.stop();
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            if let Some(track) = self.resume_track.take() {
                self.audio.play(track);
            }
            log::info!("Resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Abandon the session: cancel every timer and return to the menu
    pub fn stop(&mut self) {
        self.return_to_menu();
    }

    /// Record the final score under `player_name` and return the updated
    /// ranking. Store failures degrade to an empty list.
    pub fn submit_high_score(
        &mut self,
        store: &mut dyn HighScoreStore,
        player_name: &str,
    ) -> Result<Vec<HighScoreEntry>, Error> {
        self.expect_phase(GamePhase::HighScoreCapture)?;
        let entry = HighScoreEntry::new(player_name, self.state.score, self.state.level)?;
        log::info!(
            "Submitting high score {} for {} (level {})",
            entry.score,
            entry.player_name,
            entry.level
        );
        match store.submit(entry) {
            Ok(ranking) => Ok(ranking),
            Err(err) => {
                log::warn!("High-score store unavailable: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Current ranking, or an empty list if the store fails
    pub fn leaderboard(&self, store: &dyn HighScoreStore) -> Vec<HighScoreEntry> {
        store.top().unwrap_or_else(|err| {
            log::warn!("High-score store unavailable: {err}");
            Vec::new()
        })
    }

    /// Leave high-score capture and reset to the menu
    pub fn acknowledge_high_score(&mut self) -> Result<(), Error> {
        self.expect_phase(GamePhase::HighScoreCapture)?;
        self.return_to_menu();
        Ok(())
    }

    /// Let the demo pilot fly (or hand control back)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Flip music mute; returns the new state. The caller persists settings.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.audio.is_muted();
        self.audio.set_muted(muted);
        self.settings.music_muted = muted;
        muted
    }

    pub fn set_invert_controls(&mut self, invert: bool) {
        self.settings.invert_controls = invert;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        self.audio.drain()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), Error> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(Error::WrongPhase {
                expected,
                actual: self.state.phase,
            })
        }
    }

    fn return_to_menu(&mut self) {
        self.intent = Intent::default();
        self.resume_track = None;
        self.state.reset_session();
        self.state.events.push(GameEvent::ReturnedToMenu);
        self.route_events();
    }

    /// Move simulation events to the host queue, reacting to the ones that
    /// switch music
    pub(crate) fn route_events(&mut self) {
        for event in self.state.events.drain(..) {
            match event {
                GameEvent::GameStarted => self.audio.play(Track::Gameplay),
                GameEvent::PlayerHit => {
                    self.intent = Intent::default();
                    self.audio.play(Track::Intro);
                }
                GameEvent::ReturnedToMenu => self.audio.play(Track::Intro),
                _ => {}
            }
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::highscores::HighScores;
    use crate::sim::Pager;

    fn core() -> GameCore {
        GameCore::new(5, Tuning::default(), Settings::default()).expect("default tuning")
    }

    fn kill_player(core: &mut GameCore) {
        let state = core.state_mut();
        state.player.invulnerable = 0.0;
        let pos = state.player.pos;
        state.pagers.push(Pager::new(9_000, pos));
        core.tick(SIM_DT);
    }

    fn run_until(core: &mut GameCore, phase: GamePhase, max_seconds: f32) {
        let mut t = 0.0;
        while core.phase() != phase {
            core.tick(SIM_DT);
            t += SIM_DT;
            assert!(t < max_seconds, "stuck in {:?}", core.phase());
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn submit(&mut self, _entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, Error> {
            Err(Error::Store("offline".to_string()))
        }

        fn top(&self) -> Result<Vec<HighScoreEntry>, Error> {
            Err(Error::Store("offline".to_string()))
        }
    }

    #[test]
    fn test_music_follows_session() {
        let mut core = core();
        assert_eq!(
            core.drain_audio(),
            [
                AudioCommand::SetMuted(false),
                AudioCommand::PlayTrack(Track::Intro)
            ]
        );

        core.start_game();
        assert_eq!(core.drain_audio(), [AudioCommand::PlayTrack(Track::Gameplay)]);

        kill_player(&mut core);
        assert_eq!(core.drain_audio(), [AudioCommand::PlayTrack(Track::Intro)]);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            interstitial_every: 0,
            ..Default::default()
        };
        assert!(matches!(
            GameCore::new(1, tuning, Settings::default()),
            Err(Error::InvalidTuning {
                field: "interstitial_every",
                ..
            })
        ));

        let tuning = Tuning {
            pager_jitter_chance: 1.5,
            ..Default::default()
        };
        assert!(GameCore::with_entropy(tuning, Settings::default()).is_err());
    }

    #[test]
    fn test_pause_silences_and_resume_restores_music() {
        let mut core = core();
        core.start_game();
        core.drain_audio();

        core.pause();
        assert_eq!(core.drain_audio(), [AudioCommand::Stop]);
        core.resume();
        assert_eq!(core.drain_audio(), [AudioCommand::PlayTrack(Track::Gameplay)]);
    }

    #[test]
    fn test_stop_while_paused_plays_menu_music() {
        let mut core = core();
        core.start_game();
        core.pause();
        core.drain_audio();

        core.stop();
        assert!(!core.is_paused());
        assert_eq!(core.drain_audio(), [AudioCommand::PlayTrack(Track::Intro)]);
    }

    #[test]
    fn test_toggle_mute() {
        let mut core = core();
        core.drain_audio();
        assert!(core.toggle_mute());
        assert!(core.settings().music_muted);
        assert_eq!(core.drain_audio(), [AudioCommand::SetMuted(true)]);
        assert!(!core.toggle_mute());
    }

    #[test]
    fn test_submit_outside_capture_is_rejected() {
        let mut core = core();
        core.start_game();
        let mut store = HighScores::new();
        let err = core.submit_high_score(&mut store, "ACE").unwrap_err();
        assert!(matches!(
            err,
            Error::WrongPhase {
                expected: GamePhase::HighScoreCapture,
                actual: GamePhase::Playing
            }
        ));
        assert!(core.acknowledge_high_score().is_err());
    }

    #[test]
    fn test_capture_submit_and_acknowledge() {
        let mut core = core();
        core.start_game();
        core.state_mut().score = 1_500;
        kill_player(&mut core);
        run_until(&mut core, GamePhase::HighScoreCapture, 10.0);

        let mut store = HighScores::new();
        let ranking = core.submit_high_score(&mut store, "ace").expect("submitted");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].player_name, "ACE");
        assert_eq!(ranking[0].score, 1_500);

        core.acknowledge_high_score().expect("acknowledged");
        assert_eq!(core.phase(), GamePhase::Menu);
        assert_eq!(core.score(), 0);
        assert!(core.drain_events().contains(&GameEvent::ReturnedToMenu));
    }

    #[test]
    fn test_store_failure_degrades_to_empty() {
        let mut core = core();
        core.start_game();
        kill_player(&mut core);
        run_until(&mut core, GamePhase::HighScoreCapture, 10.0);

        let mut store = BrokenStore;
        let ranking = core.submit_high_score(&mut store, "BOB").expect("degraded");
        assert!(ranking.is_empty());
        assert!(core.leaderboard(&store).is_empty());
        assert_eq!(core.phase(), GamePhase::HighScoreCapture);
    }

    #[test]
    fn test_stop_cancels_pending_transition() {
        let mut core = core();
        core.start_game();
        core.state_mut().pagers.clear();
        core.tick(SIM_DT);
        assert_eq!(core.phase(), GamePhase::Transitioning);

        core.stop();
        assert_eq!(core.phase(), GamePhase::Menu);
        assert!(core.state().scheduler.is_empty());
        for _ in 0..300 {
            core.tick(SIM_DT);
        }
        assert_eq!(core.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_pause_suspends_timers() {
        let mut core = core();
        core.start_game();
        core.state_mut().pagers.clear();
        core.tick(SIM_DT);
        core.pause();
        for _ in 0..600 {
            core.tick(SIM_DT);
        }
        assert_eq!(core.phase(), GamePhase::Transitioning);
        core.resume();
        run_until(&mut core, GamePhase::Playing, 3.0);
        assert_eq!(core.level(), 2);
    }

    #[test]
    fn test_restart_after_stop_is_clean() {
        let mut core = core();
        core.start_game();
        core.state_mut().score = 700;
        core.stop();
        core.start_game();
        assert_eq!(core.score(), 0);
        assert_eq!(core.level(), 1);
        assert_eq!(core.phase(), GamePhase::Playing);
    }
}
