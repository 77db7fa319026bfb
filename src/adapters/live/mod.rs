//! Live adapters backed by the operating system.

pub mod clock;
