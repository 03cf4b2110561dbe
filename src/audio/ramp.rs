//! Speed ramp: a fixed-frequency task that nudges the playback rate.
//!
//! The ramp does not own a timer. It reports its next deadline and the
//! audio thread calls back once that deadline has passed.

use std::time::{Duration, Instant};

use super::types::{RampInfo, RampMode};

/// Slowest rate handed to a playback unit.
pub const MIN_RATE: f64 = 1.0e-6;
/// Fastest rate handed to a playback unit.
pub const MAX_RATE: f64 = 1.0e6;

/// Rates that are non-finite or not positive collapse back to normal speed.
/// Everything else is held inside `MIN_RATE..=MAX_RATE`.
pub fn clamp_rate(rate: f64) -> f64 {
    if !rate.is_finite() || rate <= 0.0 {
        1.0
    } else {
        rate.clamp(MIN_RATE, MAX_RATE)
    }
}

/// Rate after one tick of a ramp running at `percent` per second.
pub fn step_rate(rate: f64, mode: RampMode, percent: f64, ticks_per_second: u32) -> f64 {
    let fraction = (percent / ticks_per_second.max(1) as f64) / 100.0;
    let next = match mode {
        RampMode::Linear => rate + fraction,
        RampMode::Multiplicative => rate * (1.0 + fraction),
    };
    clamp_rate(next)
}

#[derive(Debug, Clone)]
pub struct SpeedRamp {
    mode: RampMode,
    percent_per_second: f64,
    ticks_per_second: u32,
    // Some(..) while the ramp is running.
    next_tick: Option<Instant>,
}

impl SpeedRamp {
    pub fn new(mode: RampMode, percent_per_second: f64, ticks_per_second: u32) -> Self {
        Self {
            mode,
            percent_per_second: if percent_per_second.is_finite() {
                percent_per_second
            } else {
                0.0
            },
            ticks_per_second: ticks_per_second.max(1),
            next_tick: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second as f64)
    }

    /// Start ticking one period from `now`. Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_active() {
            return false;
        }
        self.next_tick = Some(now + self.period());
        true
    }

    /// Cancel the ramp. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        self.next_tick.take().is_some()
    }

    /// Re-phase a running ramp so its first tick lands one period after `now`.
    pub fn restart(&mut self, now: Instant) {
        if self.is_active() {
            self.next_tick = Some(now + self.period());
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Consume a due tick, scheduling the following one. Missed ticks are
    /// dropped rather than replayed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }
        let period = self.period();
        let mut next = due + period;
        if next <= now {
            next = now + period;
        }
        self.next_tick = Some(next);
        true
    }

    pub fn next_rate(&self, rate: f64) -> f64 {
        step_rate(rate, self.mode, self.percent_per_second, self.ticks_per_second)
    }

    pub fn mode(&self) -> RampMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RampMode) {
        self.mode = mode;
    }

    pub fn percent_per_second(&self) -> f64 {
        self.percent_per_second
    }

    /// Update the ramp speed. Non-finite input is rejected and the previous
    /// value kept.
    pub fn set_percent_per_second(&mut self, percent: f64) -> bool {
        if !percent.is_finite() {
            return false;
        }
        self.percent_per_second = percent;
        true
    }

    pub fn info(&self) -> RampInfo {
        RampInfo {
            active: self.is_active(),
            mode: self.mode,
            percent_per_second: self.percent_per_second,
        }
    }
}
