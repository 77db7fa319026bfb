//! Generator configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `FLAKEID_*` environment variables.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::snowflake::{NodeId, TimeBase};

/// Environment variable holding the epoch (RFC 3339).
pub const ENV_EPOCH: &str = "FLAKEID_EPOCH";
/// Environment variable holding the tick length in milliseconds.
pub const ENV_TICK_MS: &str = "FLAKEID_TICK_MS";
/// Environment variable holding the default datacenter id.
pub const ENV_DATACENTER_ID: &str = "FLAKEID_DATACENTER_ID";
/// Environment variable holding the default worker id.
pub const ENV_WORKER_ID: &str = "FLAKEID_WORKER_ID";
/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "FLAKEID_LOG";

/// Settings for a generator and the binary around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Instant of timestamp tick zero.
    pub epoch: DateTime<Utc>,
    /// Length of one timestamp tick in milliseconds.
    pub tick_ms: u32,
    /// Datacenter id used when a command does not name one.
    pub datacenter_id: u8,
    /// Worker id used when a command does not name one.
    pub worker_id: u8,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch: TimeBase::default_epoch(),
            tick_ms: 1,
            datacenter_id: NodeId::DEFAULT.datacenter_id(),
            worker_id: NodeId::DEFAULT.worker_id(),
            log_level: "warn".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from `path` (if any) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an environment
    /// value is malformed, or the result fails [`GeneratorConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses YAML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides fields from variables returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the variable whose value is malformed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_EPOCH) {
            self.epoch = DateTime::parse_from_rfc3339(value.trim())
                .map_err(|e| Error::Config(format!("{ENV_EPOCH}={value}: {e}")))?
                .with_timezone(&Utc);
        }
        if let Some(value) = lookup(ENV_TICK_MS) {
            self.tick_ms = parse_env(ENV_TICK_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_DATACENTER_ID) {
            self.datacenter_id = parse_env(ENV_DATACENTER_ID, &value)?;
        }
        if let Some(value) = lookup(ENV_WORKER_ID) {
            self.worker_id = parse_env(ENV_WORKER_ID, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG) {
            self.log_level = value;
        }
        Ok(())
    }

    /// Checks the tick length and default node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `tick_ms` is zero and
    /// [`Error::FieldOutOfRange`] if a node id exceeds 31.
    pub fn validate(&self) -> Result<()> {
        self.time_base()?;
        self.node()?;
        Ok(())
    }

    /// Time base built from `epoch` and `tick_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `tick_ms` is zero.
    pub fn time_base(&self) -> Result<TimeBase> {
        TimeBase::new(self.epoch, self.tick_ms)
    }

    /// Default node built from `datacenter_id` and `worker_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if either id exceeds 31.
    pub fn node(&self) -> Result<NodeId> {
        NodeId::new(self.datacenter_id, self.worker_id)
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| Error::Config(format!("{key}={value}: {e}")))
}
