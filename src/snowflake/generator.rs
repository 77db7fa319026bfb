//! The identifier generator.

use std::sync::{Mutex, PoisonError};
use std::thread;

use super::layout::{NodeId, SnowflakeId, SEQUENCE_MASK};
use super::time::TimeBase;
use crate::adapters::live::clock::LiveClock;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::ports::{Clock, IdGenerator};

/// Mutable part of a generator, guarded by its lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorState {
    /// Tick of the last identifier issued; `None` before the first one.
    pub last_tick: Option<u64>,
    /// Sequence of the last identifier issued within `last_tick`.
    pub sequence: u16,
}

/// Mints identifiers from a clock.
///
/// One lock covers the whole of each call, including the wait for the next
/// tick when the sequence is exhausted, so identifiers leave a generator in
/// call order and no two calls observe the same `(tick, sequence)`.
pub struct Generator<C = LiveClock> {
    clock: C,
    time_base: TimeBase,
    state: Mutex<GeneratorState>,
}

impl Generator<LiveClock> {
    /// Generator over the system clock with the default epoch and 1 ms ticks.
    #[must_use]
    pub fn live() -> Self {
        Self::new(LiveClock, TimeBase::default())
    }
}

impl<C: Clock> Generator<C> {
    /// Creates a generator with fresh state.
    pub fn new(clock: C, time_base: TimeBase) -> Self {
        tracing::info!(
            epoch = %time_base.epoch(),
            tick_ms = time_base.tick_ms(),
            "identifier generator created"
        );
        Self { clock, time_base, state: Mutex::new(GeneratorState::default()) }
    }

    /// Creates a generator using the epoch and tick length from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured tick length is zero.
    pub fn from_config(clock: C, config: &GeneratorConfig) -> Result<Self> {
        Ok(Self::new(clock, config.time_base()?))
    }

    /// Epoch and tick length of the timestamp field.
    #[must_use]
    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> GeneratorState {
        *self.lock_state()
    }

    /// Mints an identifier for `datacenter_id` and `worker_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] for ids above 31 and
    /// [`Error::ClockRollback`] if the clock reads earlier than the last tick
    /// used. Clock samples outside the timestamp range fail with
    /// [`Error::BeforeEpoch`] or [`Error::TimestampOverflow`]. On error the
    /// state is left untouched.
    pub fn generate_id(&self, datacenter_id: u8, worker_id: u8) -> Result<SnowflakeId> {
        self.generate_for(NodeId::new(datacenter_id, worker_id)?)
    }

    /// Mints an identifier for datacenter 1, worker 1.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::generate_for`].
    pub fn create_next_id(&self) -> Result<SnowflakeId> {
        self.generate_for(NodeId::DEFAULT)
    }

    /// Mints an identifier for an already validated node.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate_id`].
    pub fn generate_for(&self, node: NodeId) -> Result<SnowflakeId> {
        let mut state = self.lock_state();

        let mut tick = self.sample()?;
        let sequence = match state.last_tick {
            Some(last) if tick < last => {
                tracing::warn!(last, sampled = tick, "clock moved backwards");
                return Err(Error::ClockRollback { last, sampled: tick });
            }
            Some(last) if tick == last => {
                let next = state.sequence.wrapping_add(1) & SEQUENCE_MASK;
                if next == 0 {
                    tick = self.wait_next_tick(last)?;
                }
                next
            }
            _ => 0,
        };

        let id = SnowflakeId::from_parts(tick, node, sequence)?;
        state.last_tick = Some(tick);
        state.sequence = sequence;
        Ok(id)
    }

    fn sample(&self) -> Result<u64> {
        self.time_base.tick_of(self.clock.now())
    }

    /// Re-samples until the clock passes `last`, yielding between samples.
    fn wait_next_tick(&self, last: u64) -> Result<u64> {
        tracing::debug!(tick = last, "sequence exhausted, waiting for next tick");
        loop {
            let tick = self.sample()?;
            if tick > last {
                return Ok(tick);
            }
            thread::yield_now();
        }
    }

    // State is only written after every fallible step, so a panic in the
    // clock cannot leave it half-updated.
    fn lock_state(&self) -> std::sync::MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> IdGenerator for Generator<C> {
    fn generate_id(&self, datacenter_id: u8, worker_id: u8) -> Result<SnowflakeId> {
        Generator::generate_id(self, datacenter_id, worker_id)
    }

    fn create_next_id(&self) -> Result<SnowflakeId> {
        Generator::create_next_id(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{mpsc, Arc};
    use std::time::Duration as StdDuration;

    use chrono::Duration;

    use super::*;
    use crate::adapters::manual::clock::ManualClock;

    fn manual_at(ms: i64) -> (Arc<ManualClock>, Generator<Arc<ManualClock>>) {
        let base = TimeBase::default();
        let clock = Arc::new(ManualClock::new(base.epoch() + Duration::milliseconds(ms)));
        let generator = Generator::new(Arc::clone(&clock), base);
        (clock, generator)
    }

    #[test]
    fn first_id_starts_sequence_at_zero() {
        let (_clock, generator) = manual_at(1_000);
        assert_eq!(generator.state(), GeneratorState { last_tick: None, sequence: 0 });

        let id = generator.generate_id(2, 3).unwrap();
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.datacenter_id(), 2);
        assert_eq!(id.worker_id(), 3);
        assert_eq!(id.sequence(), 0);
        assert_eq!(generator.state(), GeneratorState { last_tick: Some(1_000), sequence: 0 });
    }

    #[test]
    fn same_tick_increments_sequence() {
        let (_clock, generator) = manual_at(50);
        let sequences: Vec<u16> =
            (0..5).map(|_| generator.generate_id(1, 1).unwrap().sequence()).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn new_tick_resets_sequence() {
        let (clock, generator) = manual_at(50);
        generator.generate_id(1, 1).unwrap();
        generator.generate_id(1, 1).unwrap();

        clock.advance(Duration::milliseconds(3));
        let id = generator.generate_id(1, 1).unwrap();
        assert_eq!(id.timestamp(), 53);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let (clock, generator) = manual_at(0);
        let mut seen = HashSet::new();
        let mut previous: Option<SnowflakeId> = None;

        for i in 0..20_000 {
            if i % 700 == 0 {
                clock.advance(Duration::milliseconds(1));
            }
            let id = generator.generate_id(4, 9).unwrap();
            assert!(seen.insert(id), "duplicate id {id}");
            if let Some(prev) = previous {
                assert!(id.timestamp() >= prev.timestamp());
                assert!(id > prev);
            }
            previous = Some(id);
        }
    }

    #[test]
    fn exhausted_sequence_waits_for_next_tick() {
        let (clock, generator) = manual_at(5);
        let generator = Arc::new(generator);

        for expected in 0..=SEQUENCE_MASK {
            let id = generator.generate_id(1, 1).unwrap();
            assert_eq!(id.timestamp(), 5);
            assert_eq!(id.sequence(), expected);
        }

        let (tx, rx) = mpsc::channel();
        let worker = {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                tx.send(generator.generate_id(1, 1)).unwrap();
            })
        };

        assert!(
            rx.recv_timeout(StdDuration::from_millis(100)).is_err(),
            "4097th id was issued without the clock advancing"
        );

        clock.advance(Duration::milliseconds(1));
        let id = rx.recv_timeout(StdDuration::from_secs(5)).unwrap().unwrap();
        worker.join().unwrap();

        assert_eq!(id.timestamp(), 6);
        assert_eq!(id.sequence(), 0);
        assert_eq!(generator.state(), GeneratorState { last_tick: Some(6), sequence: 0 });
    }

    #[test]
    fn rollback_fails_and_keeps_state() {
        let (clock, generator) = manual_at(10);
        generator.generate_id(1, 1).unwrap();
        generator.generate_id(1, 1).unwrap();
        let before = generator.state();

        clock.rewind(Duration::milliseconds(5));
        let err = generator.generate_id(1, 1).unwrap_err();
        assert!(matches!(err, Error::ClockRollback { last: 10, sampled: 5 }));
        assert_eq!(generator.state(), before);

        clock.advance(Duration::milliseconds(5));
        let id = generator.generate_id(1, 1).unwrap();
        assert_eq!(id.timestamp(), 10);
        assert_eq!(id.sequence(), 2);
    }

    #[test]
    fn out_of_range_node_leaves_state_untouched() {
        let (_clock, generator) = manual_at(10);
        assert!(matches!(
            generator.generate_id(32, 0),
            Err(Error::FieldOutOfRange { field: "datacenter id", .. })
        ));
        assert!(matches!(
            generator.generate_id(0, 40),
            Err(Error::FieldOutOfRange { field: "worker id", .. })
        ));
        assert_eq!(generator.state(), GeneratorState::default());
    }

    #[test]
    fn before_epoch_is_reported() {
        let (_clock, generator) = manual_at(-10);
        assert!(matches!(generator.create_next_id(), Err(Error::BeforeEpoch { .. })));
        assert_eq!(generator.state(), GeneratorState::default());
    }

    #[test]
    fn create_next_id_uses_node_one_one() {
        let (_clock, generator) = manual_at(77);
        let id = generator.create_next_id().unwrap();
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.worker_id(), 1);
    }

    #[test]
    fn port_default_method_uses_node_one_one() {
        let (_clock, generator) = manual_at(77);
        let port: &dyn IdGenerator = &generator;
        let id = port.create_next_id().unwrap();
        assert_eq!((id.datacenter_id(), id.worker_id()), (1, 1));
        let id = port.generate_id(0, 31).unwrap();
        assert_eq!((id.datacenter_id(), id.worker_id()), (0, 31));
    }

    #[test]
    fn coarse_ticks_group_milliseconds() {
        let base = TimeBase::new(TimeBase::default_epoch(), 10).unwrap();
        let clock = Arc::new(ManualClock::new(base.epoch() + Duration::milliseconds(100)));
        let generator = Generator::new(Arc::clone(&clock), base);

        let first = generator.create_next_id().unwrap();
        clock.advance(Duration::milliseconds(9));
        let second = generator.create_next_id().unwrap();
        assert_eq!(first.timestamp(), 10);
        assert_eq!(second.timestamp(), 10);
        assert_eq!(second.sequence(), 1);
    }

    #[test]
    fn live_generator_issues_distinct_ids() {
        let generator = Generator::live();
        let ids: HashSet<_> = (0..10_000).map(|_| generator.create_next_id().unwrap()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
