//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep driven from outside
//! - Seeded RNG owned by the session
//! - Deferred state changes only through the session timer queue
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod director;
pub mod entities;
pub mod finale;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::circles_overlap;
pub use entities::{
    Bug, Explosion, ExplosionKind, FinaleMissile, FloatingScore, Missile, Pager, Player,
};
pub use scoring::{Direction, KONAMI_SEQUENCE, KonamiDetector, SessionStats};
pub use snapshot::Snapshot;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timers::{Scheduler, TimerEvent, TimerId};
