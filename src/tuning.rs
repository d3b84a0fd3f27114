//! Data-driven game balance
//!
//! Every designer-adjustable number in one serde struct. Defaults come from
//! `crate::consts`; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_friction: f32,
    pub player_thrust: f32,
    pub player_max_speed: f32,
    pub player_rotation_speed: f32,
    pub level_start_invulnerability: f32,

    // === Pagers ===
    pub pager_base_speed: f32,
    pub pager_speed_growth: f32,
    pub pager_jitter_chance: f64,
    pub pager_jitter_fraction: f32,
    pub pager_explosion_duration: f32,

    // === Missiles ===
    pub missile_speed: f32,
    pub missile_lifetime: f32,
    pub missile_bounds_margin: f32,
    pub fire_repeat_interval: f32,

    // === Bug ===
    pub bug_speed: f32,
    pub bug_lifetime: f32,
    pub bug_spawn_delay_min: f32,
    pub bug_spawn_delay_max: f32,
    pub bug_edge_margin: f32,

    // === Collision radii ===
    pub player_radius: f32,
    pub pager_radius: f32,
    pub missile_radius: f32,
    pub powered_missile_radius: f32,
    pub bug_radius: f32,
    pub close_encounter_factor: f32,

    // === Scoring ===
    pub pager_points: u64,
    pub bug_points: u64,
    pub konami_duration: f32,

    // === Levels ===
    pub base_pager_count: u32,
    pub safe_spawn_distance: f32,
    pub max_spawn_attempts: u32,
    pub level_transition_duration: f32,
    pub interstitial_every: u32,
    pub interstitial_duration: f32,

    // === Death / finale ===
    pub death_stages: u8,
    pub death_stage_interval: f32,
    pub game_over_text_duration: f32,
    pub death_watchdog: f32,
    pub finale_duration: f32,
    pub finale_complete_duration: f32,
    pub finale_grid_size: u32,
    pub finale_missile_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_friction: PLAYER_FRICTION,
            player_thrust: PLAYER_THRUST,
            player_max_speed: PLAYER_MAX_SPEED,
            player_rotation_speed: PLAYER_ROTATION_SPEED,
            level_start_invulnerability: LEVEL_START_INVULNERABILITY,

            pager_base_speed: PAGER_BASE_SPEED,
            pager_speed_growth: PAGER_SPEED_GROWTH,
            pager_jitter_chance: PAGER_JITTER_CHANCE,
            pager_jitter_fraction: PAGER_JITTER_FRACTION,
            pager_explosion_duration: PAGER_EXPLOSION_DURATION,

            missile_speed: MISSILE_SPEED,
            missile_lifetime: MISSILE_LIFETIME,
            missile_bounds_margin: MISSILE_BOUNDS_MARGIN,
            fire_repeat_interval: FIRE_REPEAT_INTERVAL,

            bug_speed: BUG_SPEED,
            bug_lifetime: BUG_LIFETIME,
            bug_spawn_delay_min: BUG_SPAWN_DELAY_MIN,
            bug_spawn_delay_max: BUG_SPAWN_DELAY_MAX,
            bug_edge_margin: BUG_EDGE_MARGIN,

            player_radius: PLAYER_COLLISION_RADIUS,
            pager_radius: PAGER_COLLISION_RADIUS,
            missile_radius: MISSILE_COLLISION_RADIUS,
            powered_missile_radius: POWERED_MISSILE_COLLISION_RADIUS,
            bug_radius: BUG_COLLISION_RADIUS,
            close_encounter_factor: CLOSE_ENCOUNTER_FACTOR,

            pager_points: PAGER_POINTS,
            bug_points: BUG_POINTS,
            konami_duration: KONAMI_DURATION,

            base_pager_count: BASE_PAGER_COUNT,
            safe_spawn_distance: SAFE_SPAWN_DISTANCE,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            level_transition_duration: LEVEL_TRANSITION_DURATION,
            interstitial_every: INTERSTITIAL_EVERY,
            interstitial_duration: INTERSTITIAL_DURATION,

            death_stages: DEATH_STAGES,
            death_stage_interval: DEATH_STAGE_INTERVAL,
            game_over_text_duration: GAME_OVER_TEXT_DURATION,
            death_watchdog: DEATH_WATCHDOG,
            finale_duration: FINALE_DURATION,
            finale_complete_duration: FINALE_COMPLETE_DURATION,
            finale_grid_size: FINALE_GRID_SIZE,
            finale_missile_speed: FINALE_MISSILE_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Homing speed of pagers on the given level (1-based)
    pub fn pager_speed(&self, level: u32) -> f32 {
        let exponent = level.saturating_sub(1) as i32;
        self.pager_base_speed * self.pager_speed_growth.powi(exponent)
    }

    /// Number of pagers spawned for the given level
    pub fn pager_count(&self, level: u32) -> u32 {
        self.base_pager_count + level
    }

    /// Upper bound on how long the death sequence may take before the watchdog
    /// forces the finale
    pub fn natural_death_sequence(&self) -> f32 {
        self.death_stages as f32 * self.death_stage_interval + self.game_over_text_duration
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), Error> {
        fn positive(field: &'static str, value: f32) -> Result<(), Error> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidTuning {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        if !(self.player_friction > 0.0 && self.player_friction <= 1.0) {
            return Err(Error::InvalidTuning {
                field: "player_friction",
                reason: format!("must be in (0, 1], got {}", self.player_friction),
            });
        }
        if !(0.0..=1.0).contains(&self.pager_jitter_chance) {
            return Err(Error::InvalidTuning {
                field: "pager_jitter_chance",
                reason: format!("must be in [0, 1], got {}", self.pager_jitter_chance),
            });
        }
        if !(self.close_encounter_factor >= 1.0 && self.close_encounter_factor.is_finite()) {
            return Err(Error::InvalidTuning {
                field: "close_encounter_factor",
                reason: format!("must be at least 1, got {}", self.close_encounter_factor),
            });
        }
        if self.bug_spawn_delay_min > self.bug_spawn_delay_max {
            return Err(Error::InvalidTuning {
                field: "bug_spawn_delay_min",
                reason: "must not exceed bug_spawn_delay_max".to_string(),
            });
        }
        if self.interstitial_every == 0 {
            return Err(Error::InvalidTuning {
                field: "interstitial_every",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.death_stages == 0 {
            return Err(Error::InvalidTuning {
                field: "death_stages",
                reason: "must be at least 1".to_string(),
            });
        }

        positive("missile_lifetime", self.missile_lifetime)?;
        positive("fire_repeat_interval", self.fire_repeat_interval)?;
        positive("bug_lifetime", self.bug_lifetime)?;
        positive("pager_explosion_duration", self.pager_explosion_duration)?;
        positive("level_transition_duration", self.level_transition_duration)?;
        positive("interstitial_duration", self.interstitial_duration)?;
        positive("konami_duration", self.konami_duration)?;
        positive("death_stage_interval", self.death_stage_interval)?;
        positive("game_over_text_duration", self.game_over_text_duration)?;
        positive("death_watchdog", self.death_watchdog)?;
        positive("finale_duration", self.finale_duration)?;
        positive("finale_complete_duration", self.finale_complete_duration)?;
        Ok(())
    }
}
