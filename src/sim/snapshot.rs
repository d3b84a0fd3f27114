//! Read-only view of the session for renderers

use glam::Vec2;
use serde::Serialize;

use super::entities::ExplosionKind;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub rotation: f32,
    pub thrusting: bool,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagerView {
    pub id: u32,
    pub pos: Vec2,
    pub exploding: bool,
    /// Close-encounter ratio, for danger colouring
    pub danger: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissileView {
    pub id: u32,
    pub pos: Vec2,
    pub powered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplosionView {
    pub pos: Vec2,
    pub kind: ExplosionKind,
    /// 0 at spawn, 1 when finished
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingScoreView {
    pub pos: Vec2,
    pub text: String,
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub shots_fired: u32,
    pub pagers_killed: u32,
    pub bugs_killed: u32,
    pub hit_rate: f64,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub konami_active: bool,
    /// Seconds of power-up left
    pub konami_remaining: Option<f32>,
    pub paused: bool,
    /// Absent once the ship has been destroyed
    pub player: Option<PlayerView>,
    /// A live pager is within the close-encounter band (show the hitbox)
    pub player_in_danger: bool,
    pub pagers: Vec<PagerView>,
    pub missiles: Vec<MissileView>,
    pub bug: Option<Vec2>,
    pub explosions: Vec<ExplosionView>,
    pub floating_scores: Vec<FloatingScoreView>,
    pub finale_missiles: Vec<Vec2>,
    pub stats: StatsView,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = (!state.death_triggered && state.phase != GamePhase::Menu).then(|| {
            PlayerView {
                pos: state.player.pos,
                rotation: state.player.rotation,
                thrusting: state.player.thrusting,
                invulnerable: state.player.is_invulnerable(),
            }
        });

        let player_in_danger = player.is_some() && state.live_pagers().any(|p| p.danger.is_some());
        let konami_remaining = state
            .konami_timer
            .and_then(|timer| state.scheduler.remaining(timer, state.clock))
            .map(|secs| secs as f32);

        Self {
            phase: state.phase,
            level: state.level,
            score: state.score,
            konami_active: state.konami_active,
            konami_remaining,
            paused: state.paused,
            player,
            player_in_danger,
            pagers: state
                .pagers
                .iter()
                .map(|p| PagerView {
                    id: p.id,
                    pos: p.pos,
                    exploding: p.exploding,
                    danger: p.danger,
                })
                .collect(),
            missiles: state
                .missiles
                .iter()
                .map(|m| MissileView {
                    id: m.id,
                    pos: m.pos,
                    powered: m.powered,
                })
                .collect(),
            bug: state.bug.as_ref().map(|b| b.pos),
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    pos: e.pos,
                    kind: e.kind,
                    progress: e.progress(),
                })
                .collect(),
            floating_scores: state
                .floating_scores
                .iter()
                .map(|f| FloatingScoreView {
                    pos: f.pos,
                    text: f.text.clone(),
                    progress: f.progress(),
                })
                .collect(),
            finale_missiles: state.finale_missiles.iter().map(|m| m.pos).collect(),
            stats: StatsView {
                shots_fired: state.stats.shots_fired,
                pagers_killed: state.stats.pagers_killed,
                bugs_killed: state.stats.bugs_killed,
                hit_rate: state.stats.hit_rate(),
            },
        }
    }
}
