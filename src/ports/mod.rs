//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the generator core and the
//! outside world (time, identifier consumers). Implementations live in
//! `src/adapters/` and `src/snowflake/`.

pub mod clock;
pub mod id_gen;

pub use clock::Clock;
pub use id_gen::IdGenerator;
