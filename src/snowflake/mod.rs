//! Snowflake-style identifiers: 41-bit timestamp, 5-bit datacenter id,
//! 5-bit worker id and 12-bit sequence packed into a `u64`.

pub mod generator;
pub mod layout;
pub mod time;

use std::sync::OnceLock;

pub use generator::{Generator, GeneratorState};
pub use layout::{IdParts, NodeId, SnowflakeId};
pub use time::TimeBase;

use crate::error::Result;

static GLOBAL: OnceLock<Generator> = OnceLock::new();

/// Process-wide generator over the system clock, built on first use with
/// the default epoch and 1 ms ticks.
pub fn global() -> &'static Generator {
    GLOBAL.get_or_init(Generator::live)
}

/// Mints an identifier for datacenter 1, worker 1 from [`global`].
///
/// # Errors
///
/// Returns [`crate::Error::ClockRollback`] if the system clock moved
/// backwards since the previous call.
pub fn create_next_id() -> Result<SnowflakeId> {
    global().create_next_id()
}

/// Mints an identifier for the given node from [`global`].
///
/// # Errors
///
/// See [`Generator::generate_id`].
pub fn generate_id(datacenter_id: u8, worker_id: u8) -> Result<SnowflakeId> {
    global().generate_id(datacenter_id, worker_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_ids_decode_to_default_node() {
        let id = create_next_id().unwrap();
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.worker_id(), 1);
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn global_ids_keep_increasing() {
        let a = generate_id(7, 7).unwrap();
        let b = generate_id(7, 7).unwrap();
        assert!(b.timestamp() >= a.timestamp());
        assert_ne!(a, b);
    }
}
