//! Deferred session events
//!
//! Every delayed state change (level transition, bug spawn, Konami expiry,
//! death stages, watchdog) is a `TimerEvent` scheduled against the session
//! clock. Timers only fire from inside `tick`, so they never mutate state
//! outside the simulation step. `cancel_all` bumps the epoch, so a token
//! from a previous session can never cancel or match a timer of the new one.

use serde::{Deserialize, Serialize};

/// Cancellation token for a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId {
    epoch: u32,
    seq: u64,
}

/// Things that happen later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Level transition pause is over; start the next level
    TransitionDone,
    /// Interstitial stats screen is over; continue into the transition
    InterstitialDone,
    /// Spawn the bonus bug for the given level
    BugSpawn { level: u32 },
    /// Konami power-up window ends
    KonamiExpire,
    /// Advance the death animation to the given stage
    DeathStage(u8),
    /// "Game over" text has been shown long enough
    GameOverTextDone,
    /// Forces the finale if the death sequence stalls
    DeathWatchdog,
    /// Fireworks wipe is over
    FinaleDone,
    /// Final ring has played; hand over to high-score capture
    FinaleCompleteDone,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    due: f64,
    event: TimerEvent,
}

/// Session-clock timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    epoch: u32,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f32, event: TimerEvent) -> TimerId {
        let id = TimerId {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.push(Pending {
            id,
            due: now + delay.max(0.0) as f64,
            event,
        });
        log::debug!("Scheduled {event:?} in {delay:.2}s");
        id
    }

    /// Cancel a pending timer. Returns false if it already fired, was
    /// cancelled, or belongs to an earlier epoch.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Invalidate every outstanding timer
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Seconds until `id` fires, if it is still pending
    pub fn remaining(&self, id: TimerId, now: f64) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.due - now).max(0.0))
    }

    /// Remove and return the earliest timer due at `now`. Ties fire in
    /// scheduling order. Call repeatedly: handlers may cancel or schedule
    /// other timers between pops.
    pub fn pop_due(&mut self, now: f64) -> Option<(TimerId, TimerEvent)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.seq.cmp(&b.id.seq)))
            .map(|(i, _)| i)?;
        let fired = self.pending.remove(index);
        Some((fired.id, fired.event))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
