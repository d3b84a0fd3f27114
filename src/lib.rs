//! PagerTron - an arcade shooter in the Asteroids/Galaga mould
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, level director, death/finale sequence)
//! - `game`: `GameCore` boundary that hosts drive with commands and read snapshots from
//! - `input`: Input mapper (thrust, rotation, joystick, shooting, Konami tokens)
//! - `driver`: Real-time tick driver feeding fixed substeps
//! - `audio`: Audio command channel consumed by the host's music player
//! - `highscores`: Leaderboard and the high-score store boundary
//! - `settings`: Persisted player preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::GameCore;
pub use error::Error;
pub use highscores::{HighScoreEntry, HighScoreStore, HighScores};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player ship physics
    pub const PLAYER_FRICTION: f32 = 0.97; // per tick
    pub const PLAYER_THRUST: f32 = 400.0; // pixels/s²
    pub const PLAYER_MAX_SPEED: f32 = 300.0;
    pub const PLAYER_ROTATION_SPEED: f32 = 180.0; // degrees/s for held rotate buttons
    pub const LEVEL_START_INVULNERABILITY: f32 = 2.0;

    /// Pagers home in at BASE * GROWTH^(level-1)
    pub const PAGER_BASE_SPEED: f32 = 40.0;
    pub const PAGER_SPEED_GROWTH: f32 = 1.1;
    pub const PAGER_JITTER_CHANCE: f64 = 0.2;
    pub const PAGER_JITTER_FRACTION: f32 = 0.5;
    pub const PAGER_EXPLOSION_DURATION: f32 = 0.5;

    /// Missiles
    pub const MISSILE_SPEED: f32 = 480.0;
    pub const MISSILE_LIFETIME: f32 = 3.0;
    pub const MISSILE_BOUNDS_MARGIN: f32 = 50.0;
    pub const FIRE_REPEAT_INTERVAL: f32 = 0.12;

    /// Bonus bug
    pub const BUG_SPEED: f32 = 140.0;
    pub const BUG_LIFETIME: f32 = 10.0;
    pub const BUG_SPAWN_DELAY_MIN: f32 = 3.0;
    pub const BUG_SPAWN_DELAY_MAX: f32 = 8.0;
    pub const BUG_EDGE_MARGIN: f32 = 25.0;

    /// Collision radii. Deliberately smaller than the sprites (player 50px,
    /// pager 50px, missile 15px, powered missile 75px, bug 50px).
    pub const PLAYER_COLLISION_RADIUS: f32 = 17.5;
    pub const PAGER_COLLISION_RADIUS: f32 = 20.0;
    pub const MISSILE_COLLISION_RADIUS: f32 = 9.0;
    pub const POWERED_MISSILE_COLLISION_RADIUS: f32 = 45.0;
    pub const BUG_COLLISION_RADIUS: f32 = 20.0;
    /// Pagers within this multiple of the player/pager collision distance
    /// count as close encounters
    pub const CLOSE_ENCOUNTER_FACTOR: f32 = 1.8;

    /// Scoring
    pub const PAGER_POINTS: u64 = 100;
    pub const BUG_POINTS: u64 = 500;

    /// Level director
    pub const BASE_PAGER_COUNT: u32 = 5;
    pub const SAFE_SPAWN_DISTANCE: f32 = 250.0;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 100;
    pub const SPAWN_EDGE_MARGIN: f32 = 25.0;
    pub const LEVEL_TRANSITION_DURATION: f32 = 2.0;
    pub const INTERSTITIAL_EVERY: u32 = 5;
    pub const INTERSTITIAL_DURATION: f32 = 5.0;

    /// Konami power-up
    pub const KONAMI_DURATION: f32 = 30.0;

    /// Death and finale sequence
    pub const DEATH_STAGES: u8 = 3;
    pub const DEATH_STAGE_INTERVAL: f32 = 0.5;
    pub const GAME_OVER_TEXT_DURATION: f32 = 1.5;
    pub const DEATH_WATCHDOG: f32 = 4.0;
    pub const FINALE_DURATION: f32 = 2.5;
    pub const FINALE_COMPLETE_DURATION: f32 = 0.5;
    pub const FINALE_GRID_SIZE: u32 = 6;
    pub const FINALE_MISSILE_SPEED: f32 = 700.0;
    pub const FINALE_RING_RADIUS: f32 = 150.0;
    pub const FINALE_RING_COUNT: u32 = 6;

    /// Effects
    pub const PLAYER_EXPLOSION_DURATION: f32 = 1.5;
    pub const FINALE_EXPLOSION_DURATION: f32 = 0.5;
    pub const FLOATING_SCORE_DURATION: f32 = 1.5;
    pub const FLOATING_SCORE_DRIFT: f32 = 50.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees, 0° pointing up (negative Y)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.sin(), -radians.cos())
}

/// Heading in degrees (0° up, clockwise) pointing along `dir`
#[inline]
pub fn vector_heading(dir: Vec2) -> f32 {
    normalize_degrees(dir.x.atan2(-dir.y).to_degrees())
}

/// Wrap a coordinate into [0, extent)
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Wrap a position into the screen rectangle, each axis independently
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(
        wrap_coordinate(pos.x, bounds.x),
        wrap_coordinate(pos.y, bounds.y),
    )
}

/// Screen bounds as a vector
#[inline]
pub fn screen_bounds() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH, consts::SCREEN_HEIGHT)
}

/// Screen centre, where the player spawns
#[inline]
pub fn screen_center() -> Vec2 {
    screen_bounds() * 0.5
}
