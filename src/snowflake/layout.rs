//! Bit layout of an identifier.
//!
//! ```text
//! | 1 bit: 0 | 41 bits: timestamp | 5 bits: datacenter | 5 bits: worker | 12 bits: sequence |
//! ```
//!
//! These widths are the wire contract for anything that decodes or sorts
//! identifiers. Changing them requires versioning the format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width of the timestamp field.
pub const TIMESTAMP_BITS: u32 = 41;
/// Width of the datacenter id field.
pub const DATACENTER_ID_BITS: u32 = 5;
/// Width of the worker id field.
pub const WORKER_ID_BITS: u32 = 5;
/// Width of the sequence field.
pub const SEQUENCE_BITS: u32 = 12;

/// Offset of the worker id field.
pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
/// Offset of the datacenter id field.
pub const DATACENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
/// Offset of the timestamp field.
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS;

/// Largest representable timestamp tick.
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
/// Largest datacenter id.
pub const MAX_DATACENTER_ID: u8 = (1 << DATACENTER_ID_BITS) - 1;
/// Largest worker id.
pub const MAX_WORKER_ID: u8 = (1 << WORKER_ID_BITS) - 1;
/// Mask applied to the sequence counter; also its largest value.
pub const SEQUENCE_MASK: u16 = (1 << SEQUENCE_BITS) - 1;

/// Datacenter and worker pair identifying where identifiers are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    datacenter_id: u8,
    worker_id: u8,
}

impl NodeId {
    /// Node used by `create_next_id`: datacenter 1, worker 1.
    pub const DEFAULT: Self = Self { datacenter_id: 1, worker_id: 1 };

    /// Builds a node id, rejecting values that would spill into
    /// neighbouring fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if either id exceeds 31.
    pub fn new(datacenter_id: u8, worker_id: u8) -> Result<Self> {
        if datacenter_id > MAX_DATACENTER_ID {
            return Err(Error::FieldOutOfRange {
                field: "datacenter id",
                value: u64::from(datacenter_id),
                max: u64::from(MAX_DATACENTER_ID),
            });
        }
        if worker_id > MAX_WORKER_ID {
            return Err(Error::FieldOutOfRange {
                field: "worker id",
                value: u64::from(worker_id),
                max: u64::from(MAX_WORKER_ID),
            });
        }
        Ok(Self { datacenter_id, worker_id })
    }

    /// Datacenter id (0-31).
    #[must_use]
    pub fn datacenter_id(self) -> u8 {
        self.datacenter_id
    }

    /// Worker id (0-31).
    #[must_use]
    pub fn worker_id(self) -> u8 {
        self.worker_id
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A packed 64-bit identifier.
///
/// Ordering follows the numeric value, so identifiers sort by tick first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnowflakeId(u64);

/// The four fields of an identifier, unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdParts {
    /// Ticks since the epoch.
    pub timestamp: u64,
    /// Datacenter id.
    pub datacenter_id: u8,
    /// Worker id.
    pub worker_id: u8,
    /// Intra-tick sequence.
    pub sequence: u16,
}

impl SnowflakeId {
    /// Packs the four fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `timestamp` exceeds 41 bits.
    /// The sequence is masked to 12 bits.
    pub fn from_parts(timestamp: u64, node: NodeId, sequence: u16) -> Result<Self> {
        if timestamp > MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { tick: timestamp });
        }
        Ok(Self(
            (timestamp << TIMESTAMP_SHIFT)
                | (u64::from(node.datacenter_id) << DATACENTER_ID_SHIFT)
                | (u64::from(node.worker_id) << WORKER_ID_SHIFT)
                | u64::from(sequence & SEQUENCE_MASK),
        ))
    }

    /// Wraps a raw value without checking it.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Ticks since the epoch.
    #[must_use]
    pub const fn timestamp(self) -> u64 {
        (self.0 >> TIMESTAMP_SHIFT) & MAX_TIMESTAMP
    }

    /// Datacenter id.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn datacenter_id(self) -> u8 {
        ((self.0 >> DATACENTER_ID_SHIFT) as u8) & MAX_DATACENTER_ID
    }

    /// Worker id.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn worker_id(self) -> u8 {
        ((self.0 >> WORKER_ID_SHIFT) as u8) & MAX_WORKER_ID
    }

    /// Intra-tick sequence.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn sequence(self) -> u16 {
        (self.0 as u16) & SEQUENCE_MASK
    }

    /// Unpacks all four fields.
    #[must_use]
    pub const fn parts(self) -> IdParts {
        IdParts {
            timestamp: self.timestamp(),
            datacenter_id: self.datacenter_id(),
            worker_id: self.worker_id(),
            sequence: self.sequence(),
        }
    }

    /// File name of the form `<id>.<extension>`.
    #[must_use]
    pub fn file_name(self, extension: &str) -> String {
        format!("{}.{}", self.0, extension.trim_start_matches('.'))
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.0
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim().parse::<u64>().map(Self).map_err(|_| Error::InvalidId(s.to_string()))
    }
}
