//! Service context bundling the clock a command runs against.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::recording::RecordingClock;
use crate::adapters::replaying::ReplayingClock;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Bundles the port objects a command needs.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Arc<dyn Clock>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context backed by the system clock.
    #[must_use]
    pub fn live() -> Self {
        Self { clock: Arc::new(LiveClock), recorder: None }
    }

    /// Creates a context backed by the system clock that records every sample.
    ///
    /// The cassette is written to `path` by [`ServiceContext::finish`].
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "flakeid-session")));
        let clock = RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder));
        Self { clock: Arc::new(clock), recorder: Some(recorder) }
    }

    /// Creates a context whose clock replays the samples stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)
            .map_err(|e| format!("Failed to load cassette {}: {e}", path.display()))?;
        Ok(Self::replaying_cassette(&cassette))
    }

    /// Creates a context whose clock replays an in-memory cassette.
    #[must_use]
    pub fn replaying_cassette(cassette: &Cassette) -> Self {
        let clock = ReplayingClock::new(CassetteReplayer::new(cassette));
        Self { clock: Arc::new(clock), recorder: None }
    }

    /// Writes the cassette of a recording context.
    ///
    /// Returns the cassette path, or `None` for contexts that do not record.
    /// Every clone of [`ServiceContext::clock`] must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock is still shared or the file cannot be
    /// written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Some(recorder) = self.recorder else {
            return Ok(None);
        };
        drop(self.clock);
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "Recording clock still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        let path = recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))?;
        Ok(Some(path))
    }
}
