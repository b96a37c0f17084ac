// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame time and repeat budgets.
//!
//! [`Duration`] represents a span of frame time in fractional seconds. The
//! frame loop is driven by deltas the embedder measures however its platform
//! allows; the engine only ever accumulates and compares them, so a plain
//! `f64` seconds representation is sufficient and keeps the core `no_std`.
//!
//! [`Repeat`] is the shared repeat budget for tickers, action loops, and
//! audio playback: a finite count or forever.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A span of frame time in seconds.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration(f64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0.0);

    /// Creates a duration from fractional seconds.
    ///
    /// Negative inputs are clamped to zero.
    #[inline]
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        Self(if secs > 0.0 { secs } else { 0.0 })
    }

    /// Creates a duration from fractional milliseconds.
    #[inline]
    #[must_use]
    pub fn from_millis(millis: f64) -> Self {
        Self::from_secs(millis / 1_000.0)
    }

    /// Returns the duration as fractional seconds.
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// Returns the duration as fractional milliseconds.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> f64 {
        self.0 * 1_000.0
    }

    /// Whether this duration is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }

    /// Subtraction clamped at zero.
    #[inline]
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self::from_secs(self.0 - rhs.0)
    }

    /// The ratio `self / divisor`, or zero when `divisor` is zero.
    #[inline]
    #[must_use]
    pub fn div_duration(self, divisor: Self) -> f64 {
        if divisor.is_zero() { 0.0 } else { self.0 / divisor.0 }
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Duration {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}s)", self.0)
    }
}

/// How many times something repeats.
///
/// Replaces the `-1` sentinel convention: a finite count is explicit and
/// unsigned, and "repeat forever" is its own variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Run exactly this many times.
    Times(u32),
    /// Never stop on a count.
    Forever,
}

impl Repeat {
    /// A single run.
    pub const ONCE: Self = Self::Times(1);

    /// Whether `done` completed runs exhaust this budget.
    #[inline]
    #[must_use]
    pub const fn reached(self, done: u32) -> bool {
        match self {
            Self::Times(n) => done >= n,
            Self::Forever => false,
        }
    }

    /// Whether the budget is a finite count.
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Times(_))
    }
}
