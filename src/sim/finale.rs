//! Player death and the finale sequence
//!
//! Playing -> Exploding(1..N) -> GameOver -> Finale -> FinaleComplete ->
//! HighScoreCapture. Each step is a phase-step timer. A watchdog started at
//! the hit forces the finale if the staged steps stall, and is cancelled
//! when the finale is entered normally.

use glam::Vec2;

use super::entities::{Explosion, ExplosionKind, FinaleMissile};
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::TimerEvent;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{screen_bounds, screen_center};

/// Targets closer than this to the centre get no finale missile
const MIN_FINALE_TARGET_DISTANCE: f32 = 10.0;

/// Start the death sequence. Only the first call per life has any effect.
/// Returns true if the sequence was started.
pub fn trigger_player_death(state: &mut GameState, tuning: &Tuning) -> bool {
    if state.phase != GamePhase::Playing || state.death_triggered {
        return false;
    }
    state.death_triggered = true;

    state.missiles.clear();
    state.player.thrusting = false;
    state.player.vel = Vec2::ZERO;
    if let Some(timer) = state.bug_timer.take() {
        state.scheduler.cancel(timer);
    }
    state.explosions.push(Explosion::new(
        state.player.pos,
        ExplosionKind::Player,
        PLAYER_EXPLOSION_DURATION,
    ));

    state.set_phase(GamePhase::Exploding { stage: 1 });
    state.events.push(GameEvent::PlayerHit);
    state.schedule_phase_step(tuning.death_stage_interval, TimerEvent::DeathStage(2));
    state.watchdog = Some(state.schedule(tuning.death_watchdog, TimerEvent::DeathWatchdog));
    log::info!("Player hit at level {} with score {}", state.level, state.score);
    true
}

/// Timer handler: advance the staged death animation, or show the
/// game-over text once every stage has played
pub fn advance_death_stage(state: &mut GameState, tuning: &Tuning, stage: u8) {
    if !matches!(state.phase, GamePhase::Exploding { .. }) {
        return;
    }
    state.phase_timer = None;

    if stage <= tuning.death_stages {
        state.set_phase(GamePhase::Exploding { stage });
        state.schedule_phase_step(
            tuning.death_stage_interval,
            TimerEvent::DeathStage(stage.saturating_add(1)),
        );
    } else {
        state.set_phase(GamePhase::GameOver);
        state.events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
        state.schedule_phase_step(tuning.game_over_text_duration, TimerEvent::GameOverTextDone);
    }
}

/// Timer handler: game-over text has been shown long enough
pub fn finish_game_over_text(state: &mut GameState, tuning: &Tuning) {
    if state.phase == GamePhase::GameOver {
        state.phase_timer = None;
        enter_finale(state, tuning);
    }
}

/// Timer handler: the death sequence did not reach the finale in time
pub fn fire_watchdog(state: &mut GameState, tuning: &Tuning) {
    state.watchdog = None;
    if matches!(state.phase, GamePhase::Exploding { .. } | GamePhase::GameOver) {
        log::warn!("Death sequence stalled in {:?}; forcing finale", state.phase);
        enter_finale(state, tuning);
    }
}

/// Wipe the board and launch the fireworks
pub fn enter_finale(state: &mut GameState, tuning: &Tuning) {
    if !matches!(state.phase, GamePhase::Exploding { .. } | GamePhase::GameOver) {
        return;
    }
    if let Some(watchdog) = state.watchdog.take() {
        state.scheduler.cancel(watchdog);
    }
    if let Some(timer) = state.phase_timer.take() {
        state.scheduler.cancel(timer);
    }
    if state.phase != GamePhase::GameOver {
        state.events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
    }

    let former_enemies: Vec<Vec2> = state
        .pagers
        .iter()
        .map(|p| p.pos)
        .chain(state.bug.as_ref().map(|b| b.pos))
        .collect();
    state.pagers.clear();
    state.bug = None;
    state.missiles.clear();

    state.finale_missiles = finale_volley(&former_enemies, tuning.finale_grid_size);
    log::info!("Finale with {} missiles", state.finale_missiles.len());

    state.set_phase(GamePhase::Finale);
    state.events.push(GameEvent::FinaleStarted);
    state.schedule_phase_step(tuning.finale_duration, TimerEvent::FinaleDone);
}

/// Missiles from the centre toward each former enemy and each cell of a
/// `grid_size` x `grid_size` screen grid
pub fn finale_volley(former_enemies: &[Vec2], grid_size: u32) -> Vec<FinaleMissile> {
    let center = screen_center();
    let bounds = screen_bounds();
    let cells = grid_size.max(1) as f32;

    let grid = (0..grid_size).flat_map(|row| {
        (0..grid_size).map(move |col| {
            Vec2::new(
                (col as f32 + 0.5) / cells * bounds.x,
                (row as f32 + 0.5) / cells * bounds.y,
            )
        })
    });

    former_enemies
        .iter()
        .copied()
        .chain(grid)
        .filter_map(|target| {
            let offset = target - center;
            (offset.length() > MIN_FINALE_TARGET_DISTANCE).then(|| FinaleMissile {
                pos: center,
                dir: offset.normalize(),
            })
        })
        .collect()
}

/// Per-tick finale update: fly the missiles, turning each into an explosion
/// at the screen edge as it leaves
pub fn update_finale(state: &mut GameState, tuning: &Tuning, dt: f32) {
    let bounds = screen_bounds();
    let mut landed = Vec::new();
    state.finale_missiles.retain_mut(|missile| {
        missile.update(dt, tuning.finale_missile_speed);
        if missile.off_screen() {
            landed.push(missile.pos.clamp(Vec2::ZERO, bounds));
            false
        } else {
            true
        }
    });
    state.explosions.extend(
        landed
            .into_iter()
            .map(|pos| Explosion::new(pos, ExplosionKind::Finale, FINALE_EXPLOSION_DURATION)),
    );
}

/// Timer handler: fireworks done, play the final ring
pub fn complete_finale(state: &mut GameState, tuning: &Tuning) {
    if state.phase != GamePhase::Finale {
        return;
    }
    state.phase_timer = None;
    state.finale_missiles.clear();

    let center = screen_center();
    for i in 0..FINALE_RING_COUNT {
        let angle = i as f32 / FINALE_RING_COUNT as f32 * std::f32::consts::TAU;
        let pos = center + Vec2::from_angle(angle) * FINALE_RING_RADIUS;
        state
            .explosions
            .push(Explosion::new(pos, ExplosionKind::Finale, FINALE_EXPLOSION_DURATION));
    }

    state.set_phase(GamePhase::FinaleComplete);
    state.events.push(GameEvent::FinaleCompleted);
    state.schedule_phase_step(tuning.finale_complete_duration, TimerEvent::FinaleCompleteDone);
}

/// Timer handler: hand the final score to high-score capture
pub fn begin_high_score_capture(state: &mut GameState) {
    if state.phase != GamePhase::FinaleComplete {
        return;
    }
    state.phase_timer = None;
    state.set_phase(GamePhase::HighScoreCapture);
    state.events.push(GameEvent::HighScoreCapture {
        score: state.score,
        level: state.level,
    });
    log::info!("High-score capture: score {} level {}", state.score, state.level);
}
