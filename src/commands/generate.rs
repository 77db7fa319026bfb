//! `flakeid generate` command.

use crate::ports::IdGenerator;

/// Execute the `generate` command.
///
/// # Errors
///
/// Returns an error string if a node id is out of range or the clock moved
/// backwards.
pub fn run(
    generator: &dyn IdGenerator,
    datacenter_id: u8,
    worker_id: u8,
    count: usize,
) -> Result<(), String> {
    for line in render(generator, datacenter_id, worker_id, count)? {
        println!("{line}");
    }
    Ok(())
}

/// Mints `count` identifiers for one node, in issue order.
///
/// # Errors
///
/// Stops at the first failure and returns it as a string.
pub fn render(
    generator: &dyn IdGenerator,
    datacenter_id: u8,
    worker_id: u8,
    count: usize,
) -> Result<Vec<String>, String> {
    (0..count)
        .map(|_| {
            generator
                .generate_id(datacenter_id, worker_id)
                .map(|id| id.to_string())
                .map_err(|e| e.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::adapters::manual::ManualClock;
    use crate::snowflake::{Generator, SnowflakeId, TimeBase};

    fn frozen_generator() -> Generator<Arc<ManualClock>> {
        Generator::new(Arc::new(ManualClock::new(Utc::now())), TimeBase::default())
    }

    #[test]
    fn mints_requested_count_for_node() {
        let lines = render(&frozen_generator(), 3, 7, 5).unwrap();
        let ids: Vec<SnowflakeId> = lines.iter().map(|l| l.parse().unwrap()).collect();
        assert_eq!(ids.len(), 5);
        for (expected_seq, id) in (0..).zip(&ids) {
            assert_eq!(id.datacenter_id(), 3);
            assert_eq!(id.worker_id(), 7);
            assert_eq!(id.sequence(), expected_seq);
        }
    }

    #[test]
    fn out_of_range_worker_fails() {
        let err = render(&frozen_generator(), 0, 32, 1).unwrap_err();
        assert!(err.contains("worker id 32"));
    }

    #[test]
    fn zero_count_prints_nothing() {
        assert!(render(&frozen_generator(), 1, 1, 0).unwrap().is_empty());
    }
}
