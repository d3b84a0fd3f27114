//! Fixed timestep simulation tick
//!
//! One call advances the session clock, fires due timers, then runs the
//! update for the current phase. Only `Playing` moves entities and checks
//! collisions; the death and finale phases animate effects only.

use super::autopilot;
use super::collision;
use super::director;
use super::entities::Missile;
use super::finale;
use super::scoring;
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::TimerEvent;
use crate::tuning::Tuning;

/// Player intent for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust held
    pub thrusting: bool,
    /// Held rotation, -1 (counter-clockwise) to 1 (clockwise)
    pub rotate: f32,
    /// Fire held (auto-repeats)
    pub shooting: bool,
    /// Fire pressed since last tick (fires regardless of cooldown)
    pub fire: bool,
    /// Demo mode - the autopilot replaces this input
    pub autopilot: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    if state.paused {
        return;
    }

    state.clock += dt as f64;
    run_due_timers(state, tuning);

    match state.phase {
        GamePhase::Playing => {
            if input.autopilot {
                let driven = autopilot::drive(state, tuning);
                update_playing(state, &driven, tuning, dt);
            } else {
                update_playing(state, input, tuning, dt);
            }
        }
        GamePhase::Finale => {
            finale::update_finale(state, tuning, dt);
            update_effects(state, dt);
        }
        GamePhase::Exploding { .. } | GamePhase::GameOver | GamePhase::FinaleComplete => {
            update_effects(state, dt);
        }
        GamePhase::Menu
        | GamePhase::Transitioning
        | GamePhase::Interstitial
        | GamePhase::HighScoreCapture => {}
    }
}

fn run_due_timers(state: &mut GameState, tuning: &Tuning) {
    while let Some((_, event)) = state.scheduler.pop_due(state.clock) {
        log::debug!("Timer fired: {event:?}");
        match event {
            TimerEvent::TransitionDone => director::advance_level(state, tuning),
            TimerEvent::InterstitialDone => director::finish_interstitial(state, tuning),
            TimerEvent::BugSpawn { level } => director::spawn_bug(state, tuning, level),
            TimerEvent::KonamiExpire => scoring::expire_konami(state),
            TimerEvent::DeathStage(stage) => finale::advance_death_stage(state, tuning, stage),
            TimerEvent::GameOverTextDone => finale::finish_game_over_text(state, tuning),
            TimerEvent::DeathWatchdog => finale::fire_watchdog(state, tuning),
            TimerEvent::FinaleDone => finale::complete_finale(state, tuning),
            TimerEvent::FinaleCompleteDone => finale::begin_high_score_capture(state),
        }
    }
}

fn update_playing(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    // Steer
    if input.rotate != 0.0 {
        let amount = input.rotate.clamp(-1.0, 1.0) * tuning.player_rotation_speed * dt;
        state.player.rotate(amount);
    }
    state.player.thrusting = input.thrusting;
    if input.thrusting {
        state.player.thrust(dt, tuning);
    }
    state.player.update(dt, tuning);

    // Fire: immediately on press, then at the repeat interval while held
    state.fire_cooldown = (state.fire_cooldown - dt).max(0.0);
    if input.fire || (input.shooting && state.fire_cooldown <= 0.0) {
        fire_missile(state, tuning);
    }

    // Move
    let target = state.player.pos;
    let level = state.level;
    for pager in &mut state.pagers {
        pager.update(dt, target, level, tuning, &mut state.rng);
    }
    for missile in &mut state.missiles {
        missile.update(dt);
    }
    if let Some(bug) = &mut state.bug {
        bug.update(dt, tuning);
    }
    update_effects(state, dt);

    // Collide
    collision::resolve_missile_pager_hits(state, tuning);
    collision::resolve_missile_bug_hit(state, tuning);
    collision::track_close_encounters(state, tuning);
    if let Some(pager_id) = collision::player_pager_collision(state, tuning) {
        log::debug!("Player collided with pager {pager_id}");
        finale::trigger_player_death(state, tuning);
        return;
    }

    // Cull
    state.missiles.retain(|m| !m.should_remove(tuning));
    state.pagers.retain(|p| !p.should_remove(tuning));
    if state.bug.as_ref().is_some_and(|b| b.should_remove(tuning)) {
        state.bug = None;
        state.events.push(GameEvent::BugEscaped);
        log::debug!("Bug escaped");
    }

    director::check_wave_clear(state, tuning);
}

/// Launch a missile from the ship along its heading
pub fn fire_missile(state: &mut GameState, tuning: &Tuning) {
    let id = state.next_entity_id();
    let powered = state.konami_active;
    state.missiles.push(Missile::fire(
        id,
        state.player.pos,
        state.player.rotation,
        tuning.missile_speed,
        powered,
    ));
    state.stats.shots_fired += 1;
    state.fire_cooldown = tuning.fire_repeat_interval;
    state.events.push(GameEvent::MissileFired { powered });
}

fn update_effects(state: &mut GameState, dt: f32) {
    for explosion in &mut state.explosions {
        explosion.update(dt);
    }
    state.explosions.retain(|e| !e.finished());

    for label in &mut state.floating_scores {
        label.update(dt);
    }
    state.floating_scores.retain(|l| !l.finished());
}
