//! Demo-mode pilot
//!
//! Turns toward the nearest target, fires once roughly aligned and closes
//! distance when everything is far away. A small time-based wobble keeps it
//! from looking robotic.

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;
use crate::{normalize_degrees, vector_heading};

/// Fire when the heading is within this many degrees of the target
const AIM_TOLERANCE: f32 = 12.0;
/// Thrust toward targets farther than this
const CHASE_DISTANCE: f32 = 350.0;

/// Signed shortest rotation from `from` to `to`, in [-180, 180)
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from + 180.0) - 180.0
}

/// Intent for this tick
pub fn drive(state: &GameState, tuning: &Tuning) -> TickInput {
    let player = &state.player;
    let nearest = state
        .live_pagers()
        .map(|p| p.pos)
        .chain(state.bug.as_ref().map(|b| b.pos))
        .min_by(|a, b| {
            a.distance_squared(player.pos)
                .total_cmp(&b.distance_squared(player.pos))
        });

    let Some(target) = nearest else {
        return TickInput {
            autopilot: true,
            ..Default::default()
        };
    };

    let t = state.clock as f32;
    let wobble = (t * 1.3).sin() * 4.0 + (t * 0.7).sin() * 2.0;
    let desired = vector_heading(target - player.pos) + wobble;
    let delta = angle_delta(player.rotation, desired);

    let max_step = tuning.player_rotation_speed * SIM_DT;
    let rotate = if max_step > 0.0 {
        (delta / max_step).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let aligned = delta.abs() < AIM_TOLERANCE;

    TickInput {
        thrusting: aligned && target.distance(player.pos) > CHASE_DISTANCE,
        rotate,
        shooting: aligned,
        fire: false,
        autopilot: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::director;
    use crate::sim::entities::Pager;
    use glam::Vec2;

    #[test]
    fn test_angle_delta() {
        assert_eq!(angle_delta(0.0, 90.0), 90.0);
        assert_eq!(angle_delta(350.0, 10.0), 20.0);
        assert_eq!(angle_delta(10.0, 350.0), -20.0);
    }

    #[test]
    fn test_turns_toward_target_on_right() {
        let tuning = Tuning::default();
        let mut state = GameState::new(4);
        director::start_game(&mut state, &tuning);
        let pos = state.player.pos;
        state.pagers = vec![Pager::new(1, pos + Vec2::new(300.0, 0.0))];

        let input = drive(&state, &tuning);
        assert!(input.rotate > 0.0);
        assert!(!input.shooting);
    }

    #[test]
    fn test_fires_when_aligned() {
        let tuning = Tuning::default();
        let mut state = GameState::new(4);
        director::start_game(&mut state, &tuning);
        let pos = state.player.pos;
        state.pagers = vec![Pager::new(1, pos - Vec2::new(0.0, 200.0))];

        let input = drive(&state, &tuning);
        assert!(input.shooting);
        assert!(!input.thrusting);
    }

    #[test]
    fn test_idle_without_targets() {
        let tuning = Tuning::default();
        let state = GameState::new(4);
        let input = drive(&state, &tuning);
        assert!(!input.shooting && !input.thrusting);
        assert_eq!(input.rotate, 0.0);
    }
}
