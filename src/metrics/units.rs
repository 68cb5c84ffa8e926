//! Byte counts and their human-scaled display form.

use serde::{Deserialize, Serialize};
use std::fmt;

const DIVIDER: f64 = 1024.0;

/// Binary unit prefixes, in scaling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ByteUnit {
    B,
    K,
    M,
    G,
    T,
    P,
}

impl ByteUnit {
    /// All units from smallest to largest.
    pub const ALL: [ByteUnit; 6] = [
        ByteUnit::B,
        ByteUnit::K,
        ByteUnit::M,
        ByteUnit::G,
        ByteUnit::T,
        ByteUnit::P,
    ];

    /// The bare prefix letter ("B" for plain bytes).
    pub fn as_str(self) -> &'static str {
        match self {
            ByteUnit::B => "B",
            ByteUnit::K => "K",
            ByteUnit::M => "M",
            ByteUnit::G => "G",
            ByteUnit::T => "T",
            ByteUnit::P => "P",
        }
    }

    /// The suffix printed after a scaled value, e.g. "KB".
    pub fn suffix(self) -> &'static str {
        match self {
            ByteUnit::B => "B",
            ByteUnit::K => "KB",
            ByteUnit::M => "MB",
            ByteUnit::G => "GB",
            ByteUnit::T => "TB",
            ByteUnit::P => "PB",
        }
    }
}

impl fmt::Display for ByteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scale a raw byte count into a `(value, unit)` pair.
///
/// The value is divided by 1024 until it drops below 1024 or the unit
/// sequence runs out, in which case everything larger stays in petabytes.
/// The returned value is rounded to two decimal places.
pub fn scale(bytes: u64) -> (f64, ByteUnit) {
    let mut value = bytes as f64;
    let last = ByteUnit::ALL.len() - 1;

    for (idx, unit) in ByteUnit::ALL.iter().enumerate() {
        if value < DIVIDER || idx == last {
            return (round2(value), *unit);
        }
        value /= DIVIDER;
    }

    unreachable!("unit sequence always yields on its last entry")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A non-negative number of bytes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Raw byte count.
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Human-scaled form, see [`scale`].
    pub fn scaled(self) -> (f64, ByteUnit) {
        scale(self.0)
    }
}

impl From<u64> for ByteSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, unit) = self.scaled();
        write!(f, "{:.2}{}", value, unit.suffix())
    }
}
