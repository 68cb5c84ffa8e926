//! System metrics acquisition and normalization.
//!
//! Raw readings come from a [`Host`]; the sources in [`sources`] turn them
//! into the snapshot types in [`data`], with byte counts carried as
//! [`ByteSize`] values.

pub mod collector;
pub mod data;
pub mod host;
pub mod procfs;
pub mod sources;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use collector::SystemCollector;
pub use host::Host;
pub use sources::MetricSource;
pub use units::{scale, ByteSize, ByteUnit};
