//! `UpdateClock` — cooperative per-subsystem interval timer.
//!
//! Every subsystem that updates on a coarser cadence than the global `dt`
//! (models, space mechanics, substrate integration, history snapshots) owns
//! one of these.  The scheduler advances the clock by `dt` each tick; the
//! subsystem runs only when [`due`][UpdateClock::due] and then resets.
//!
//! A zero interval fires on every tick.

use crate::time::{Millis, TimeSpan};

/// Interval timer with `interval` and `elapsed` in milliseconds.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct UpdateClock {
    interval: Millis,
    elapsed: Millis,
}

impl UpdateClock {
    /// Create a clock firing every `interval`.  `None` means every tick.
    pub fn new(interval: Option<TimeSpan>) -> Self {
        Self {
            interval: interval.map(TimeSpan::to_millis).unwrap_or(Millis::ZERO),
            elapsed: Millis::ZERO,
        }
    }

    /// A clock that is due on every tick.
    pub fn every_tick() -> Self {
        Self::default()
    }

    #[inline]
    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// Time accumulated since the last reset.  Subsystems use this as the
    /// effective `dt` of their update step.
    #[inline]
    pub fn elapsed(&self) -> Millis {
        self.elapsed
    }

    /// `true` once at least one full interval has accumulated.
    #[inline]
    pub fn due(&self) -> bool {
        self.interval <= self.elapsed
    }

    /// Accumulate `dt` of global time.
    #[inline]
    pub fn increase(&mut self, dt: Millis) {
        self.elapsed += dt;
    }

    /// Zero the accumulated time after an update has run.
    #[inline]
    pub fn reset(&mut self) {
        self.elapsed = Millis::ZERO;
    }
}
