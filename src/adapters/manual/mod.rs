//! Adapters driven by hand, for tests and simulations.

pub mod clock;

pub use clock::ManualClock;
