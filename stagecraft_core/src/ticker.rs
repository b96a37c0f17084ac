// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval timer primitive.
//!
//! A [`Ticker`] accumulates frame deltas and fires whenever the accumulated
//! time reaches its interval, carrying the remainder over so fire times do
//! not drift. An oversized delta fires as many times as fit in it rather
//! than dropping ticks. The fire budget is a [`Repeat`]; a finite ticker
//! reports [`is_exhausted`](Ticker::is_exhausted) once spent, which is how
//! tasks know to remove themselves.

use crate::time::{Duration, Repeat};

/// Remainder-carrying interval timer.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    budget: Repeat,
    elapsed: Duration,
    fired: u32,
    running: bool,
}

impl Ticker {
    /// Creates a running ticker that fires every `interval`, at most
    /// `budget` times.
    #[must_use]
    pub fn new(interval: Duration, budget: Repeat) -> Self {
        Self {
            interval,
            budget,
            elapsed: Duration::ZERO,
            fired: 0,
            running: true,
        }
    }

    /// Resumes accumulation.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops accumulation. A stopped ticker ignores
    /// [`update`](Self::update) entirely.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Clears accumulated time and the fire count.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.fired = 0;
    }

    /// Whether the ticker is accumulating.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The fire interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the fire interval. Accumulated time is kept.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Time accumulated toward the next fire.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// How many times the ticker has fired since creation or
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn times_fired(&self) -> u32 {
        self.fired
    }

    /// Whether a finite budget has been spent.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.budget.reached(self.fired)
    }

    /// Feeds a frame delta, returning how many times the ticker fired.
    ///
    /// A zero interval fires once per update. The remainder past the last
    /// fire stays accumulated for the next update.
    pub fn update(&mut self, dt: Duration) -> u32 {
        if !self.running || self.is_exhausted() {
            return 0;
        }
        if self.interval.is_zero() {
            self.fired += 1;
            return 1;
        }
        self.elapsed += dt;
        let mut fires = 0;
        while self.elapsed >= self.interval && !self.is_exhausted() {
            self.elapsed -= self.interval;
            self.fired += 1;
            fires += 1;
        }
        fires
    }
}
