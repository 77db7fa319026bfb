//! Conversion between clock samples and timestamp ticks.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::layout::MAX_TIMESTAMP;
use crate::error::{Error, Result};

/// Epoch and tick length that define the timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    epoch: DateTime<Utc>,
    tick_ms: u32,
}

impl TimeBase {
    /// Builds a time base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `tick_ms` is zero.
    pub fn new(epoch: DateTime<Utc>, tick_ms: u32) -> Result<Self> {
        if tick_ms == 0 {
            return Err(Error::Config("tick length must be at least 1 ms".into()));
        }
        Ok(Self { epoch, tick_ms })
    }

    /// 2020-01-01T00:00:00Z.
    #[must_use]
    pub fn default_epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Reference instant of tick zero.
    #[must_use]
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Length of one tick in milliseconds.
    #[must_use]
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Number of whole ticks between the epoch and `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BeforeEpoch`] if `now` precedes the epoch and
    /// [`Error::TimestampOverflow`] if the count exceeds 41 bits.
    pub fn tick_of(&self, now: DateTime<Utc>) -> Result<u64> {
        let elapsed = now.signed_duration_since(self.epoch).num_milliseconds();
        let elapsed = u64::try_from(elapsed)
            .map_err(|_| Error::BeforeEpoch { now, epoch: self.epoch })?;
        let tick = elapsed / u64::from(self.tick_ms);
        if tick > MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { tick });
        }
        Ok(tick)
    }

    /// Instant at which `tick` begins, or `None` if it is not representable.
    #[must_use]
    pub fn instant_of(&self, tick: u64) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(tick.checked_mul(u64::from(self.tick_ms))?).ok()?;
        self.epoch.checked_add_signed(Duration::try_milliseconds(millis)?)
    }

    /// Last instant representable by the timestamp field.
    #[must_use]
    pub fn horizon(&self) -> Option<DateTime<Utc>> {
        self.instant_of(MAX_TIMESTAMP)
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self { epoch: Self::default_epoch(), tick_ms: 1 }
    }
}
