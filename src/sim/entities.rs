//! Entity records and their per-tick update rules
//!
//! Positions are entity centres in screen space (origin top-left, +Y down).
//! Rotation is in degrees with 0° pointing up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;
use crate::{heading_vector, normalize_degrees, screen_bounds, screen_center, wrap_position};

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees, [0, 360)
    pub rotation: f32,
    pub thrusting: bool,
    /// Seconds of invulnerability remaining (never negative)
    pub invulnerable: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn(0.0)
    }
}

impl Player {
    /// Fresh ship at screen centre, pointing up, at rest
    pub fn spawn(invulnerable: f32) -> Self {
        Self {
            pos: screen_center(),
            vel: Vec2::ZERO,
            rotation: 0.0,
            thrusting: false,
            invulnerable: invulnerable.max(0.0),
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Count down invulnerability, apply friction, integrate and wrap
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.vel *= tuning.player_friction;
        self.pos = wrap_position(self.pos + self.vel * dt, screen_bounds());
    }

    /// Accelerate along the current heading, capped at max speed
    pub fn thrust(&mut self, dt: f32, tuning: &Tuning) {
        self.vel += heading_vector(self.rotation) * tuning.player_thrust * dt;
        self.vel = self.vel.clamp_length_max(tuning.player_max_speed);
    }

    /// Rotate by a signed number of degrees
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
    }

    /// Point the ship at an absolute heading
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }
}

/// The homing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pager {
    pub id: u32,
    pub pos: Vec2,
    pub exploding: bool,
    /// Seconds since the pager was hit
    pub explosion_time: f32,
    /// Distance to the player over the collision distance while within the
    /// close-encounter band; below 1.0 means touching
    pub danger: Option<f32>,
}

impl Pager {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            exploding: false,
            explosion_time: 0.0,
            danger: None,
        }
    }

    /// Home in on the player; exploding pagers only run their timer
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        target: Vec2,
        level: u32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        if self.exploding {
            self.explosion_time += dt;
            return;
        }

        let speed = tuning.pager_speed(level);
        let to_target = (target - self.pos).normalize_or_zero();
        let mut step = to_target * speed * dt;

        if tuning.pager_jitter_chance > 0.0 && rng.random_bool(tuning.pager_jitter_chance) {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            step += Vec2::from_angle(angle) * speed * tuning.pager_jitter_fraction * dt;
        }

        self.pos += step;
    }

    /// Mark as hit; idempotent
    pub fn explode(&mut self) {
        if !self.exploding {
            self.exploding = true;
            self.explosion_time = 0.0;
            self.danger = None;
        }
    }

    /// Can this pager still collide with missiles or the player?
    pub fn is_live(&self) -> bool {
        !self.exploding
    }

    pub fn should_remove(&self, tuning: &Tuning) -> bool {
        self.exploding && self.explosion_time > tuning.pager_explosion_duration
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub time_alive: f32,
    /// Fired while the Konami power-up was active
    pub powered: bool,
}

impl Missile {
    /// Missile leaving `pos` along `rotation` degrees
    pub fn fire(id: u32, pos: Vec2, rotation: f32, speed: f32, powered: bool) -> Self {
        Self {
            id,
            pos,
            vel: heading_vector(rotation) * speed,
            time_alive: 0.0,
            powered,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.time_alive += dt;
    }

    /// Collision radius, larger for powered shots
    pub fn radius(&self, tuning: &Tuning) -> f32 {
        if self.powered {
            tuning.powered_missile_radius
        } else {
            tuning.missile_radius
        }
    }

    /// Expired or left the screen (plus margin)
    pub fn should_remove(&self, tuning: &Tuning) -> bool {
        let bounds = screen_bounds();
        let margin = tuning.missile_bounds_margin;
        self.time_alive > tuning.missile_lifetime
            || self.pos.x < -margin
            || self.pos.x > bounds.x + margin
            || self.pos.y < -margin
            || self.pos.y > bounds.y + margin
    }
}

/// The rare bouncing bonus enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub time_alive: f32,
}

impl Bug {
    /// Bug moving along `heading` degrees at `speed`
    pub fn new(id: u32, pos: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: heading_vector(heading) * speed,
            time_alive: 0.0,
        }
    }

    /// Random diagonal heading: one of the four diagonals, +/- 20°
    pub fn random_heading<R: Rng>(rng: &mut R) -> f32 {
        let quadrant = rng.random_range(0..4u32) as f32;
        let wobble: f32 = rng.random_range(-20.0..20.0);
        normalize_degrees(45.0 + quadrant * 90.0 + wobble)
    }

    /// Move, bouncing off the screen edges, and age
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.pos += self.vel * dt;
        self.time_alive += dt;

        let bounds = screen_bounds();
        let margin = tuning.bug_edge_margin;
        let (min_x, max_x) = (margin, bounds.x - margin);
        let (min_y, max_y) = (margin, bounds.y - margin);

        if self.pos.x <= min_x {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x >= max_x {
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y <= min_y {
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y >= max_y {
            self.vel.y = -self.vel.y.abs();
        }
        self.pos = self.pos.clamp(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
    }

    pub fn should_remove(&self, tuning: &Tuning) -> bool {
        self.time_alive >= tuning.bug_lifetime
    }
}

/// What an explosion marks, for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Pager,
    Bug,
    Player,
    Finale,
}

/// Time-driven explosion marker (no collision)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub kind: ExplosionKind,
    pub elapsed: f32,
    pub duration: f32,
}

impl Explosion {
    pub fn new(pos: Vec2, kind: ExplosionKind, duration: f32) -> Self {
        Self {
            pos,
            kind,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// 0 at spawn, 1 when finished
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Score label that floats up from a kill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingScore {
    pub text: String,
    pub points: u64,
    pub pos: Vec2,
    pub elapsed: f32,
    pub duration: f32,
    pub from_bug: bool,
}

impl FloatingScore {
    pub fn new(points: u64, pos: Vec2, from_bug: bool) -> Self {
        let text = if from_bug {
            format!("SQUASHED THE BUG +{points}")
        } else {
            format!("+{points}")
        };
        Self {
            text,
            points,
            pos,
            elapsed: 0.0,
            duration: FLOATING_SCORE_DURATION,
            from_bug,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.pos.y -= FLOATING_SCORE_DRIFT * dt;
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Decorative projectile of the finale wipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinaleMissile {
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
}

impl FinaleMissile {
    pub fn update(&mut self, dt: f32, speed: f32) {
        self.pos += self.dir * speed * dt;
    }

    pub fn off_screen(&self) -> bool {
        let bounds = screen_bounds();
        self.pos.x < 0.0 || self.pos.x > bounds.x || self.pos.y < 0.0 || self.pos.y > bounds.y
    }
}
