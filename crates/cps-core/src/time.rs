//! Simulation time model.
//!
//! # Design
//!
//! The canonical internal time unit is the integer millisecond, wrapped in
//! [`Millis`].  User-facing durations are `(value, unit)` expressions
//! ([`TimeSpan`]) that are converted once, at the API boundary:
//!
//!   millis = round(value * unit_in_millis)
//!
//! Using an integer millisecond as the canonical unit means all scheduling
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── Millis ────────────────────────────────────────────────────────────────────

/// An absolute or relative simulation time in integer milliseconds.
///
/// Stored as `u64`: at millisecond resolution a u64 lasts ~585 million years,
/// far longer than any conceivable run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// The stored value as `f64`, for rate arithmetic.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Express this duration in `unit` (e.g. days for logging).
    #[inline]
    pub fn in_unit(self, unit: TimeUnit) -> f64 {
        self.0 as f64 / unit.in_millis() as f64
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Millis {
    #[inline]
    fn add_assign(&mut self, rhs: Millis) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Millis {
    type Output = Millis;
    #[inline]
    fn sub(self, rhs: Millis) -> Millis {
        Millis(self.0 - rhs.0)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

// ── TimeUnit ──────────────────────────────────────────────────────────────────

/// A named unit of time accepted in duration expressions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum TimeUnit {
    Ms,
    Sec,
    Min,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    /// Milliseconds per one of this unit.
    #[inline]
    pub const fn in_millis(self) -> u64 {
        match self {
            TimeUnit::Ms => 1,
            TimeUnit::Sec => 1_000,
            TimeUnit::Min => 60 * 1_000,
            TimeUnit::Hour => 60 * 60 * 1_000,
            TimeUnit::Day => 24 * 60 * 60 * 1_000,
            TimeUnit::Week => 7 * 24 * 60 * 60 * 1_000,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => Ok(TimeUnit::Ms),
            "sec" => Ok(TimeUnit::Sec),
            "min" => Ok(TimeUnit::Min),
            "hour" => Ok(TimeUnit::Hour),
            "day" => Ok(TimeUnit::Day),
            "week" => Ok(TimeUnit::Week),
            other => Err(CoreError::UnknownTimeUnit(other.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeUnit::Ms => "ms",
            TimeUnit::Sec => "sec",
            TimeUnit::Min => "min",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
        };
        f.write_str(s)
    }
}

// ── TimeSpan ──────────────────────────────────────────────────────────────────

/// A `(value, unit)` duration expression, e.g. `(1.5, TimeUnit::Hour)`.
///
/// Cheap to copy; converted to [`Millis`] once at the point of use.
#[derive(Copy, Clone, PartialEq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    pub value: f64,
    pub unit: TimeUnit,
}

impl TimeSpan {
    pub fn new(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Convert to the canonical integer-millisecond representation.
    ///
    /// Fractional results round to the nearest millisecond.
    #[inline]
    pub fn to_millis(self) -> Millis {
        Millis((self.value * self.unit.in_millis() as f64).round() as u64)
    }

    /// The duration in `unit` as a float (e.g. for rate constants per day).
    #[inline]
    pub fn in_unit(self, unit: TimeUnit) -> f64 {
        self.value * self.unit.in_millis() as f64 / unit.in_millis() as f64
    }
}

impl From<(f64, TimeUnit)> for TimeSpan {
    fn from((value, unit): (f64, TimeUnit)) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
