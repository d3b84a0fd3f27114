//! Real-time tick driver
//!
//! Hosts hand over elapsed wall-clock time; the driver clamps spikes,
//! accumulates it and runs whole `SIM_DT` substeps, at most
//! `MAX_SUBSTEPS` per frame. Anything beyond the cap is dropped rather
//! than replayed.

use std::time::{Duration, Instant};

use crate::consts::*;
use crate::game::GameCore;

#[derive(Debug, Clone, Default)]
pub struct TickDriver {
    accumulator: f32,
    last: Option<Instant>,
    /// Total substeps run
    steps: u64,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `frame_dt` seconds of real time; returns substeps run
    pub fn advance(&mut self, core: &mut GameCore, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            core.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }

        self.steps += substeps as u64;
        substeps
    }

    /// Measure time since the previous pump and advance by it
    pub fn pump(&mut self, core: &mut GameCore, now: Instant) -> u32 {
        let frame_dt = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        self.advance(core, frame_dt)
    }

    /// Reset timing after a pause or host stall so the gap isn't simulated
    pub fn reset_clock(&mut self) {
        self.last = None;
        self.accumulator = 0.0;
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Drive `core` in real time until `done` returns true or `limit` passes
    pub fn run_blocking(
        &mut self,
        core: &mut GameCore,
        limit: Duration,
        mut done: impl FnMut(&mut GameCore) -> bool,
    ) {
        let frame = Duration::from_secs_f32(SIM_DT);
        let start = Instant::now();
        self.reset_clock();

        while start.elapsed() < limit {
            self.pump(core, Instant::now());
            if done(core) {
                break;
            }
            std::thread::sleep(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    fn core() -> GameCore {
        let mut core =
            GameCore::new(2, Tuning::default(), Settings::default()).expect("default tuning");
        core.start_game();
        core
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut core = core();
        let mut driver = TickDriver::new();
        assert_eq!(driver.advance(&mut core, SIM_DT * 0.5), 0);
        assert_eq!(driver.advance(&mut core, SIM_DT * 0.6), 1);
    }

    #[test]
    fn test_spike_is_clamped_and_capped() {
        let mut core = core();
        let mut driver = TickDriver::new();
        let steps = driver.advance(&mut core, 5.0);
        assert!(steps <= MAX_SUBSTEPS);
        // Spike is clamped, so an empty follow-up frame runs nothing
        assert_eq!(driver.advance(&mut core, 0.0), 0);
    }

    #[test]
    fn test_pump_measures_elapsed() {
        let mut core = core();
        let mut driver = TickDriver::new();
        let t0 = Instant::now();
        assert_eq!(driver.pump(&mut core, t0), 0);
        let steps = driver.pump(&mut core, t0 + Duration::from_millis(60));
        assert_eq!(steps, 3);
        assert_eq!(driver.steps(), 3);
    }

    #[test]
    fn test_run_blocking_stops_when_done() {
        let mut core = core();
        let mut driver = TickDriver::new();
        driver.run_blocking(&mut core, Duration::from_secs(2), |core| {
            core.state_mut().pagers.clear();
            core.phase() == GamePhase::Transitioning
        });
        assert_eq!(core.phase(), GamePhase::Transitioning);
    }
}
