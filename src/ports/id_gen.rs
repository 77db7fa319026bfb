//! ID generator port for producing unique identifiers.

use crate::error::Result;
use crate::snowflake::{NodeId, SnowflakeId};

/// Generates unique, roughly time-ordered identifiers.
///
/// Collaborators such as file-naming helpers depend on this trait rather
/// than on a concrete generator.
pub trait IdGenerator: Send + Sync {
    /// Mints an identifier for the given datacenter and worker.
    ///
    /// # Errors
    ///
    /// Fails if either id is out of range or the clock moved backwards.
    fn generate_id(&self, datacenter_id: u8, worker_id: u8) -> Result<SnowflakeId>;

    /// Mints an identifier for datacenter 1, worker 1.
    ///
    /// # Errors
    ///
    /// Same as [`IdGenerator::generate_id`].
    fn create_next_id(&self) -> Result<SnowflakeId> {
        self.generate_id(NodeId::DEFAULT.datacenter_id(), NodeId::DEFAULT.worker_id())
    }
}
