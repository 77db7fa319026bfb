//! Clock port for obtaining the current time.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Abstracting time access lets tests drive the generator through ticks,
/// rollbacks and sequence exhaustion, and lets recorded sessions replay.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
