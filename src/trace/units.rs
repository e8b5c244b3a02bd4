//! Time units for the two clocks a conversion deals with.
//!
//! Build logs record steps in milliseconds; `-ftime-trace` files and the
//! Chrome Trace Format use microseconds. Keeping them as separate types means
//! the only way to cross between them is [`Millis::to_micros`].

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Microseconds per millisecond.
pub const MICROS_PER_MILLI: u64 = 1000;

/// A timestamp or duration in the build log's clock (milliseconds).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

/// A timestamp or duration in the trace clock (microseconds).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Micros(pub u64);

impl Millis {
    pub const fn to_micros(self) -> Micros {
        Micros(self.0.saturating_mul(MICROS_PER_MILLI))
    }
}

impl Micros {
    /// Truncates any sub-millisecond remainder.
    pub const fn to_millis_floor(self) -> Millis {
        Millis(self.0 / MICROS_PER_MILLI)
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

/// Saturates at zero: a step can't end before it starts.
impl Sub for Millis {
    type Output = Millis;

    fn sub(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Micros {
    type Output = Micros;

    fn add(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Micros {
    type Output = Micros;

    fn sub(self, rhs: Micros) -> Micros {
        Micros(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}µs", self.0)
    }
}
