//! Crate-wide error type.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while generating, decoding or configuring identifiers.
#[derive(Debug, Error)]
pub enum Error {
    /// The clock reported a tick earlier than the last one used.
    #[error("clock moved backwards: last tick {last}, sampled tick {sampled}")]
    ClockRollback {
        /// Tick of the most recently issued identifier.
        last: u64,
        /// Tick sampled by the failing call.
        sampled: u64,
    },
    /// A node id does not fit its bit field.
    #[error("{field} {value} is out of range (0-{max})")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied by the caller.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },
    /// The clock reads an instant before the configured epoch.
    #[error("clock reads {now}, which is before the epoch {epoch}")]
    BeforeEpoch {
        /// Sampled instant.
        now: DateTime<Utc>,
        /// Configured epoch.
        epoch: DateTime<Utc>,
    },
    /// Elapsed ticks no longer fit the 41-bit timestamp field.
    #[error("tick {tick} does not fit the 41-bit timestamp field")]
    TimestampOverflow {
        /// Tick count that overflowed.
        tick: u64,
    },
    /// Text that should hold an identifier could not be parsed.
    #[error("invalid identifier {0:?}")]
    InvalidId(String),
    /// Configuration is inconsistent or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Serde yaml error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_message_names_both_ticks() {
        let err = Error::ClockRollback { last: 10, sampled: 7 };
        assert_eq!(err.to_string(), "clock moved backwards: last tick 10, sampled tick 7");
    }

    #[test]
    fn out_of_range_message() {
        let err = Error::FieldOutOfRange { field: "worker id", value: 32, max: 31 };
        assert_eq!(err.to_string(), "worker id 32 is out of range (0-31)");
    }
}
