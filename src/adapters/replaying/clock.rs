//! Replaying adapter for the Clock port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock values from a cassette.
///
/// # Panics
///
/// `now` panics once the recorded samples run out.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction("clock", "now").output
        };
        serde_json::from_value(output).expect("clock::now: failed to deserialize DateTime<Utc>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn make_replayer(samples: &[&str]) -> CassetteReplayer {
        let interactions = samples
            .iter()
            .zip(0..)
            .map(|(sample, seq)| Interaction {
                seq,
                port: "clock".into(),
                method: "now".into(),
                input: json!(null),
                output: json!(sample),
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.0.0".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[test]
    fn replaying_clock_serves_recorded_time() {
        let clock = ReplayingClock::new(make_replayer(&["2024-06-15T10:30:00Z"]));
        assert_eq!(clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
    }

    #[test]
    fn replaying_clock_serves_samples_in_order() {
        let clock = ReplayingClock::new(make_replayer(&[
            "2024-01-01T00:00:00.005Z",
            "2024-01-01T00:00:00.001Z",
        ]));
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 < t1, "backwards samples must replay as recorded");
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn replaying_clock_panics_when_exhausted() {
        let clock = ReplayingClock::new(make_replayer(&["2024-01-01T00:00:00Z"]));
        let _ = clock.now();
        let _ = clock.now();
    }
}
