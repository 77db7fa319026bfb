//! Cassette format for recording and replaying clock samples.

pub mod format;
pub mod recorder;
pub mod replayer;
