//! Input mapper
//!
//! Setters hosts call from keyboard, touch-joystick or button handlers.
//! Presses are ignored unless the game is `Playing` and not paused; releases
//! are always taken so a key let go between levels or while paused is not
//! left held. Repeated calls with the same held state are harmless, so OS
//! key-repeat never re-triggers a press.

use crate::game::GameCore;
use crate::sim::GamePhase;
use crate::sim::scoring::{self, Direction};

/// Joystick deflection below this is treated as centred
pub const JOYSTICK_DEADZONE: f32 = 0.1;

/// Held rotation from discrete buttons or keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    CounterClockwise,
    Clockwise,
}

impl Rotation {
    fn axis(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::CounterClockwise => -1.0,
            Self::Clockwise => 1.0,
        }
    }
}

/// Heading in degrees for a joystick deflection (screen axes, +Y down).
/// The invert flag turns the ship to face the opposite way.
pub fn joystick_heading(x: f32, y: f32, invert: bool) -> f32 {
    let heading = y.atan2(x).to_degrees() + 90.0;
    crate::normalize_degrees(if invert { heading + 180.0 } else { heading })
}

impl GameCore {
    fn accepts_input(&self) -> bool {
        self.state.phase == GamePhase::Playing && !self.state.paused
    }

    pub fn set_thrusting(&mut self, thrusting: bool) {
        if !thrusting || self.accepts_input() {
            self.intent.thrusting = thrusting;
        }
    }

    /// Hold (or release) a rotate button
    pub fn set_rotating(&mut self, rotation: Rotation) {
        if rotation == Rotation::None || self.accepts_input() {
            self.intent.rotate = rotation.axis();
        }
    }

    /// Point the ship at an absolute heading in degrees
    pub fn set_player_rotation(&mut self, degrees: f32) {
        if self.accepts_input() {
            self.state.player.set_rotation(degrees);
        }
    }

    /// Analog stick in [-1, 1] per axis: points the ship along the stick and
    /// thrusts while it is pushed past the deadzone
    pub fn set_joystick(&mut self, x: f32, y: f32) {
        let pushed = x.hypot(y) > JOYSTICK_DEADZONE;
        if !pushed {
            self.intent.thrusting = false;
            return;
        }
        if !self.accepts_input() {
            return;
        }
        let heading = joystick_heading(x, y, self.settings.invert_controls);
        self.state.player.set_rotation(heading);
        self.intent.thrusting = true;
    }

    /// Fire button. A press fires on the next tick; holding auto-repeats.
    pub fn set_shooting(&mut self, shooting: bool) {
        if !shooting {
            self.intent.shooting = false;
            return;
        }
        if !self.accepts_input() {
            return;
        }
        if !self.intent.shooting {
            self.intent.fire_pending = true;
        }
        self.intent.shooting = true;
    }

    /// Directional token (arrow key, swipe) for the Konami detector
    pub fn handle_directional_input(&mut self, dir: Direction) {
        if !self.accepts_input() {
            return;
        }
        scoring::handle_directional_input(&mut self.state, &self.tuning, dir);
        self.route_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::{GameEvent, KONAMI_SEQUENCE};
    use crate::tuning::Tuning;

    fn playing(invert: bool) -> GameCore {
        let settings = Settings {
            invert_controls: invert,
            ..Default::default()
        };
        let mut core = GameCore::new(9, Tuning::default(), settings).expect("default tuning");
        core.start_game();
        core
    }

    fn same_heading(a: f32, b: f32) -> bool {
        let diff = (a - b).rem_euclid(360.0);
        diff < 1e-3 || diff > 360.0 - 1e-3
    }

    #[test]
    fn test_joystick_heading() {
        assert!(same_heading(joystick_heading(0.0, -1.0, false), 0.0));
        assert!(same_heading(joystick_heading(1.0, 0.0, false), 90.0));
        assert!(same_heading(joystick_heading(0.0, 1.0, false), 180.0));
        assert!(same_heading(joystick_heading(1.0, 0.0, true), 270.0));
    }

    #[test]
    fn test_joystick_sets_heading_and_thrust() {
        let mut core = playing(false);
        core.set_joystick(1.0, 0.0);
        assert!((core.state().player.rotation - 90.0).abs() < 1e-3);
        assert!(core.intent.thrusting);

        core.set_joystick(0.05, 0.0);
        assert!(!core.intent.thrusting);
        assert!((core.state().player.rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_inverted_joystick() {
        let mut core = playing(true);
        core.set_joystick(1.0, 0.0);
        assert!((core.state().player.rotation - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_invert_does_not_affect_buttons() {
        let mut core = playing(true);
        core.set_rotating(Rotation::Clockwise);
        core.tick(SIM_DT);
        let rotation = core.state().player.rotation;
        assert!(rotation > 0.0 && rotation < 10.0);
    }

    #[test]
    fn test_inputs_ignored_outside_playing() {
        let mut core =
            GameCore::new(9, Tuning::default(), Settings::default()).expect("default tuning");
        core.set_thrusting(true);
        core.set_shooting(true);
        core.set_rotating(Rotation::Clockwise);
        core.set_player_rotation(45.0);
        assert!(!core.intent.thrusting);
        assert!(!core.intent.fire_pending);
        assert_eq!(core.intent.rotate, 0.0);
        assert_eq!(core.state().player.rotation, 0.0);
    }

    #[test]
    fn test_inputs_ignored_while_paused() {
        let mut core = playing(false);
        core.pause();
        core.set_thrusting(true);
        assert!(!core.intent.thrusting);
    }

    #[test]
    fn test_release_during_transition_is_honoured() {
        let mut core = playing(false);
        core.set_thrusting(true);
        core.set_shooting(true);
        core.set_rotating(Rotation::Clockwise);
        core.state_mut().pagers.clear();
        core.tick(SIM_DT);
        assert_eq!(core.phase(), GamePhase::Transitioning);

        core.set_thrusting(false);
        core.set_shooting(false);
        core.set_rotating(Rotation::None);

        let mut t = 0.0;
        while core.phase() != GamePhase::Playing {
            core.tick(SIM_DT);
            t += SIM_DT;
            assert!(t < 5.0, "stuck in {:?}", core.phase());
        }
        assert_eq!(core.level(), 2);

        let shots = core.state().stats.shots_fired;
        for _ in 0..60 {
            core.tick(SIM_DT);
        }
        assert_eq!(core.state().stats.shots_fired, shots);
        assert!(!core.state().player.thrusting);
        assert_eq!(core.state().player.vel, glam::Vec2::ZERO);
        assert_eq!(core.state().player.rotation, 0.0);
    }

    #[test]
    fn test_release_while_paused_is_honoured() {
        let mut core = playing(false);
        core.set_thrusting(true);
        core.set_shooting(true);
        core.tick(SIM_DT);
        let shots = core.state().stats.shots_fired;

        core.pause();
        core.set_thrusting(false);
        core.set_shooting(false);
        core.set_joystick(0.0, 0.0);
        core.resume();

        for _ in 0..60 {
            core.tick(SIM_DT);
        }
        assert_eq!(core.state().stats.shots_fired, shots);
        assert!(!core.intent.thrusting);
    }

    #[test]
    fn test_press_while_paused_is_still_ignored() {
        let mut core = playing(false);
        core.pause();
        core.set_shooting(true);
        core.set_joystick(1.0, 0.0);
        assert!(!core.intent.shooting);
        assert!(!core.intent.fire_pending);
        assert!(!core.intent.thrusting);
        assert_eq!(core.state().player.rotation, 0.0);
    }

    #[test]
    fn test_shooting_rising_edge_only() {
        let mut core = playing(false);
        core.set_shooting(true);
        core.tick(SIM_DT);
        assert_eq!(core.state().stats.shots_fired, 1);

        // Key repeat while held does not re-fire
        core.set_shooting(true);
        core.tick(SIM_DT);
        assert_eq!(core.state().stats.shots_fired, 1);

        core.set_shooting(false);
        core.set_shooting(true);
        core.tick(SIM_DT);
        assert_eq!(core.state().stats.shots_fired, 2);
    }

    #[test]
    fn test_konami_through_core() {
        let mut core = playing(false);
        for dir in KONAMI_SEQUENCE {
            core.handle_directional_input(dir);
        }
        assert!(core.state().konami_active);
        assert!(core.drain_events().contains(&GameEvent::KonamiActivated));
    }
}
