//! Level and wave director
//!
//! Spawns each wave, schedules the bonus bug, detects the wave clear and
//! walks the between-level flow: optional interstitial, transition pause,
//! next level.

use glam::Vec2;
use rand::Rng;

use super::entities::{Bug, Pager, Player};
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::TimerEvent;
use crate::consts::*;
use crate::screen_center;
use crate::tuning::Tuning;

/// Pick a random on-screen point at least `min_distance` from `avoid`.
///
/// Gives up after `max_attempts` samples and falls back to the screen corner
/// farthest from `avoid`, inset by the spawn margin.
pub fn spawn_position<R: Rng>(
    rng: &mut R,
    avoid: Vec2,
    min_distance: f32,
    max_attempts: u32,
) -> Vec2 {
    let min = Vec2::splat(SPAWN_EDGE_MARGIN);
    let max = Vec2::new(
        SCREEN_WIDTH - SPAWN_EDGE_MARGIN,
        SCREEN_HEIGHT - SPAWN_EDGE_MARGIN,
    );

    for _ in 0..max_attempts {
        let candidate = Vec2::new(
            rng.random_range(min.x..max.x),
            rng.random_range(min.y..max.y),
        );
        if candidate.distance(avoid) >= min_distance {
            return candidate;
        }
    }

    let fallback = [min, Vec2::new(max.x, min.y), Vec2::new(min.x, max.y), max]
        .into_iter()
        .max_by(|a, b| a.distance_squared(avoid).total_cmp(&b.distance_squared(avoid)))
        .unwrap_or(max);
    log::warn!(
        "No spawn point {min_distance:.0}px from {avoid} after {max_attempts} attempts, using corner {fallback}"
    );
    fallback
}

/// Reset the session and start level 1
pub fn start_game(state: &mut GameState, tuning: &Tuning) {
    state.reset_session();
    state.level = 1;
    state.events.push(GameEvent::GameStarted);
    log::info!("Game started (seed {})", state.seed);
    begin_level(state, tuning);
}

/// Populate the current level: pagers away from the spawn point, a clean
/// slate of missiles and effects, and one bug spawn on a timer.
pub fn setup_level(state: &mut GameState, tuning: &Tuning) {
    state.missiles.clear();
    state.explosions.clear();
    state.floating_scores.clear();
    state.bug = None;
    state.bug_spawned_this_level = false;
    if let Some(timer) = state.bug_timer.take() {
        state.scheduler.cancel(timer);
    }

    state.pagers.clear();
    let count = tuning.pager_count(state.level);
    let spawn_point = screen_center();
    for _ in 0..count {
        let pos = spawn_position(
            &mut state.rng,
            spawn_point,
            tuning.safe_spawn_distance,
            tuning.max_spawn_attempts,
        );
        let id = state.next_entity_id();
        state.pagers.push(Pager::new(id, pos));
    }

    schedule_bug(state, tuning);

    state.events.push(GameEvent::LevelStarted {
        level: state.level,
        pagers: count,
    });
    log::info!("Level {} set up with {count} pagers", state.level);
}

fn begin_level(state: &mut GameState, tuning: &Tuning) {
    state.player = Player::spawn(tuning.level_start_invulnerability);
    state.fire_cooldown = 0.0;
    setup_level(state, tuning);
    state.set_phase(GamePhase::Playing);
}

fn schedule_bug(state: &mut GameState, tuning: &Tuning) {
    if state.bug_spawned_this_level {
        return;
    }
    let delay = if tuning.bug_spawn_delay_max > tuning.bug_spawn_delay_min {
        state
            .rng
            .random_range(tuning.bug_spawn_delay_min..tuning.bug_spawn_delay_max)
    } else {
        tuning.bug_spawn_delay_min
    };
    let level = state.level;
    state.bug_timer = Some(state.schedule(delay, TimerEvent::BugSpawn { level }));
}

/// Timer handler: spawn the level's bug if it is still wanted
pub fn spawn_bug(state: &mut GameState, tuning: &Tuning, level: u32) {
    state.bug_timer = None;
    if state.phase != GamePhase::Playing
        || state.level != level
        || state.bug.is_some()
        || state.bug_spawned_this_level
    {
        return;
    }

    let pos = spawn_position(
        &mut state.rng,
        state.player.pos,
        tuning.safe_spawn_distance,
        tuning.max_spawn_attempts,
    );
    let heading = Bug::random_heading(&mut state.rng);
    let id = state.next_entity_id();
    state.bug = Some(Bug::new(id, pos, heading, tuning.bug_speed));
    state.bug_spawned_this_level = true;
    state.events.push(GameEvent::BugSpawned);
    log::debug!("Bug spawned at {pos}");
}

/// Enter the between-level flow once every pager is gone. Returns true if
/// the wave was cleared on this call.
pub fn check_wave_clear(state: &mut GameState, tuning: &Tuning) -> bool {
    if state.phase != GamePhase::Playing || !state.pagers.is_empty() {
        return false;
    }

    let level = state.level;
    state.events.push(GameEvent::WaveCleared { level });
    log::info!("Wave {level} cleared");

    state.bug = None;
    if let Some(timer) = state.bug_timer.take() {
        state.scheduler.cancel(timer);
    }

    if level % tuning.interstitial_every == 0 {
        state.set_phase(GamePhase::Interstitial);
        state.events.push(GameEvent::InterstitialShown {
            level,
            stats: state.stats,
        });
        state.schedule_phase_step(tuning.interstitial_duration, TimerEvent::InterstitialDone);
    } else {
        begin_transition(state, tuning);
    }
    true
}

fn begin_transition(state: &mut GameState, tuning: &Tuning) {
    state.set_phase(GamePhase::Transitioning);
    state.schedule_phase_step(tuning.level_transition_duration, TimerEvent::TransitionDone);
}

/// Timer handler: the interstitial screen is done
pub fn finish_interstitial(state: &mut GameState, tuning: &Tuning) {
    if state.phase != GamePhase::Interstitial {
        return;
    }
    state.phase_timer = None;
    begin_transition(state, tuning);
}

/// Timer handler: the transition pause is done, start the next level
pub fn advance_level(state: &mut GameState, tuning: &Tuning) {
    if state.phase != GamePhase::Transitioning {
        return;
    }
    state.phase_timer = None;
    state.level += 1;
    begin_level(state, tuning);
}
