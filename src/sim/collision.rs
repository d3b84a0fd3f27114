//! Collision detection and response
//!
//! Every entity is a circle with a tuned radius smaller than its sprite.
//! Passes run once per tick after movement: missiles against pagers, missiles
//! against the bug, then the player against pagers.

use glam::Vec2;

use super::entities::{Explosion, ExplosionKind, FloatingScore};
use super::scoring::pager_points;
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Do two circles overlap? Touching (distance == sum of radii) is a miss.
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Resolve missile hits on live pagers. Each missile hits at most one pager;
/// missiles are walked in reverse so removals don't skip entries.
/// Returns the number of pagers destroyed.
pub fn resolve_missile_pager_hits(state: &mut GameState, tuning: &Tuning) -> u32 {
    let mut kills = 0;

    for mi in (0..state.missiles.len()).rev() {
        let missile_pos = state.missiles[mi].pos;
        let missile_radius = state.missiles[mi].radius(tuning);

        let Some(pager) = state.pagers.iter_mut().find(|p| {
            p.is_live() && circles_overlap(missile_pos, missile_radius, p.pos, tuning.pager_radius)
        }) else {
            continue;
        };

        pager.explode();
        let pager_id = pager.id;
        let pager_pos = pager.pos;
        state.missiles.remove(mi);

        let points = pager_points(tuning, state.konami_active);
        state.score += points;
        state.stats.pagers_killed += 1;
        state
            .explosions
            .push(Explosion::new(pager_pos, ExplosionKind::Pager, PAGER_EXPLOSION_DURATION));
        state
            .floating_scores
            .push(FloatingScore::new(points, pager_pos, false));
        state.events.push(GameEvent::PagerDestroyed {
            id: pager_id,
            points,
        });
        log::debug!("Pager {pager_id} destroyed (+{points})");
        kills += 1;
    }

    kills
}

/// Resolve a missile hit on the bug, if any. Returns true if it was squashed.
pub fn resolve_missile_bug_hit(state: &mut GameState, tuning: &Tuning) -> bool {
    let Some(bug) = &state.bug else {
        return false;
    };
    let bug_pos = bug.pos;

    let Some(mi) = state
        .missiles
        .iter()
        .rposition(|m| circles_overlap(m.pos, m.radius(tuning), bug_pos, tuning.bug_radius))
    else {
        return false;
    };

    state.missiles.remove(mi);
    state.bug = None;

    let points = tuning.bug_points;
    state.score += points;
    state.stats.bugs_killed += 1;
    state
        .explosions
        .push(Explosion::new(bug_pos, ExplosionKind::Bug, PAGER_EXPLOSION_DURATION));
    state
        .floating_scores
        .push(FloatingScore::new(points, bug_pos, true));
    state.events.push(GameEvent::BugSquashed { points });
    log::debug!("Bug squashed (+{points})");
    true
}

/// Flag every live pager inside the close-encounter band around the player
/// with its danger ratio (distance over collision distance) and clear the
/// rest. Returns how many pagers are close.
pub fn track_close_encounters(state: &mut GameState, tuning: &Tuning) -> usize {
    let player_pos = state.player.pos;
    let collision_distance = tuning.player_radius + tuning.pager_radius;
    let band = collision_distance * tuning.close_encounter_factor;

    let mut close = 0;
    for pager in &mut state.pagers {
        pager.danger = None;
        if !pager.is_live() {
            continue;
        }
        let distance = player_pos.distance(pager.pos);
        if distance < band {
            pager.danger = Some(distance / collision_distance);
            close += 1;
        }
    }
    close
}

/// First live pager touching the player, in collection order. Always `None`
/// while the player is invulnerable.
pub fn player_pager_collision(state: &GameState, tuning: &Tuning) -> Option<u32> {
    if state.player.is_invulnerable() {
        return None;
    }
    let player_pos = state.player.pos;
    state
        .live_pagers()
        .find(|p| circles_overlap(player_pos, tuning.player_radius, p.pos, tuning.pager_radius))
        .map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Bug, Missile, Pager};
    use crate::sim::state::GamePhase;

    fn playing_state() -> GameState {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state
    }

    fn add_pager(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.pagers.push(Pager::new(id, pos));
        id
    }

    fn add_missile(state: &mut GameState, pos: Vec2, powered: bool) {
        let id = state.next_entity_id();
        let mut missile = Missile::fire(id, pos, 0.0, 0.0, powered);
        missile.pos = pos;
        state.missiles.push(missile);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(30.0, 0.0), 10.0));
    }

    #[test]
    fn test_basic_kill() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        let pos = Vec2::new(100.0, 100.0);
        add_pager(&mut state, pos);
        add_missile(&mut state, pos, false);

        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 1);
        assert!(state.missiles.is_empty());
        assert!(state.pagers[0].exploding);
        assert_eq!(state.score, 100);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].pos, pos);
        assert_eq!(state.floating_scores.len(), 1);
        assert_eq!(state.floating_scores[0].pos, pos);
        assert_eq!(state.stats.pagers_killed, 1);
    }

    #[test]
    fn test_basic_kill_with_konami_doubles() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        state.konami_active = true;
        add_pager(&mut state, Vec2::new(100.0, 100.0));
        add_missile(&mut state, Vec2::new(100.0, 100.0), true);

        resolve_missile_pager_hits(&mut state, &tuning);
        assert_eq!(state.score, 200);
        assert_eq!(state.floating_scores[0].text, "+200");
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        add_pager(&mut state, Vec2::new(100.0, 100.0));
        add_missile(&mut state, Vec2::new(100.0, 100.0), false);

        resolve_missile_pager_hits(&mut state, &tuning);
        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 0);
        assert_eq!(state.score, 100);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_missile_hits_at_most_one_pager() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        add_pager(&mut state, Vec2::new(100.0, 100.0));
        add_pager(&mut state, Vec2::new(105.0, 100.0));
        add_missile(&mut state, Vec2::new(102.0, 100.0), false);

        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 1);
        assert_eq!(state.pagers.iter().filter(|p| p.exploding).count(), 1);
    }

    #[test]
    fn test_two_missiles_two_pagers() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        add_pager(&mut state, Vec2::new(100.0, 100.0));
        add_pager(&mut state, Vec2::new(400.0, 100.0));
        add_missile(&mut state, Vec2::new(100.0, 100.0), false);
        add_missile(&mut state, Vec2::new(400.0, 100.0), false);

        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 2);
        assert!(state.missiles.is_empty());
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_powered_missile_has_wider_reach() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        add_pager(&mut state, Vec2::new(100.0, 100.0));
        add_missile(&mut state, Vec2::new(150.0, 100.0), false);
        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 0);

        state.missiles.clear();
        add_missile(&mut state, Vec2::new(150.0, 100.0), true);
        assert_eq!(resolve_missile_pager_hits(&mut state, &tuning), 1);
    }

    #[test]
    fn test_bug_squash() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        state.bug = Some(Bug::new(99, Vec2::new(300.0, 300.0), 45.0, 0.0));
        add_missile(&mut state, Vec2::new(305.0, 300.0), false);

        assert!(resolve_missile_bug_hit(&mut state, &tuning));
        assert!(state.bug.is_none());
        assert_eq!(state.score, tuning.bug_points);
        assert_eq!(state.stats.bugs_killed, 1);
        assert_eq!(state.floating_scores[0].text, "SQUASHED THE BUG +500");
        assert!(!resolve_missile_bug_hit(&mut state, &tuning));
    }

    #[test]
    fn test_player_collision_respects_invulnerability() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        let pos = state.player.pos;
        let id = add_pager(&mut state, pos);

        state.player.invulnerable = 1.0;
        assert_eq!(player_pager_collision(&state, &tuning), None);

        state.player.invulnerable = 0.0;
        assert_eq!(player_pager_collision(&state, &tuning), Some(id));

        state.pagers[0].explode();
        assert_eq!(player_pager_collision(&state, &tuning), None);
    }

    #[test]
    fn test_close_encounters_flag_pagers_in_band() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        let pos = state.player.pos;
        let collision_distance = tuning.player_radius + tuning.pager_radius;

        let near = add_pager(&mut state, pos + Vec2::new(collision_distance * 1.5, 0.0));
        let far = add_pager(&mut state, pos + Vec2::new(collision_distance * 2.0, 0.0));
        let dead = add_pager(&mut state, pos + Vec2::new(0.0, 10.0));
        state.pagers[2].explode();

        assert_eq!(track_close_encounters(&mut state, &tuning), 1);
        let danger_of = |id: u32| state.pagers.iter().find(|p| p.id == id).and_then(|p| p.danger);
        let near_danger = danger_of(near).expect("near pager is close");
        assert!((near_danger - 1.5).abs() < 1e-4);
        assert_eq!(danger_of(far), None);
        assert_eq!(danger_of(dead), None);
    }

    #[test]
    fn test_close_encounter_clears_when_pager_leaves_band() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        let pos = state.player.pos;
        add_pager(&mut state, pos + Vec2::new(30.0, 0.0));
        track_close_encounters(&mut state, &tuning);
        assert!(state.pagers[0].danger.is_some_and(|d| d < 1.0));

        state.pagers[0].pos = pos + Vec2::new(500.0, 0.0);
        assert_eq!(track_close_encounters(&mut state, &tuning), 0);
        assert_eq!(state.pagers[0].danger, None);
    }

    #[test]
    fn test_player_collision_reports_first_in_order() {
        let tuning = Tuning::default();
        let mut state = playing_state();
        let pos = state.player.pos;
        let first = add_pager(&mut state, pos + Vec2::new(5.0, 0.0));
        add_pager(&mut state, pos - Vec2::new(5.0, 0.0));
        assert_eq!(player_pager_collision(&state, &tuning), Some(first));
    }
}
