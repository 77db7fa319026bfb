//! `flakeid decode` command.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::snowflake::{IdParts, SnowflakeId, TimeBase};

#[derive(Serialize)]
struct Decoded {
    id: SnowflakeId,
    #[serde(flatten)]
    parts: IdParts,
    time: Option<DateTime<Utc>>,
}

/// Execute the `decode` command.
///
/// # Errors
///
/// Returns an error string if `id` is not a decimal `u64`.
pub fn run(id: &str, time_base: &TimeBase, json: bool) -> Result<(), String> {
    println!("{}", render(id, time_base, json)?);
    Ok(())
}

/// Describes the fields of `id` as aligned text or pretty JSON.
///
/// # Errors
///
/// Returns an error string if `id` is not a decimal `u64`.
pub fn render(id: &str, time_base: &TimeBase, json: bool) -> Result<String, String> {
    let id: SnowflakeId = id.parse().map_err(|e: crate::Error| e.to_string())?;
    let parts = id.parts();
    let decoded = Decoded { id, parts, time: time_base.instant_of(parts.timestamp) };

    if json {
        return serde_json::to_string_pretty(&decoded).map_err(|e| e.to_string());
    }

    let time = decoded.time.map_or_else(
        || "out of range".to_string(),
        |t| t.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    let mut out = String::new();
    let _ = writeln!(out, "id:         {id}");
    let _ = writeln!(out, "timestamp:  {}", parts.timestamp);
    let _ = writeln!(out, "time:       {time}");
    let _ = writeln!(out, "datacenter: {}", parts.datacenter_id);
    let _ = writeln!(out, "worker:     {}", parts.worker_id);
    let _ = write!(out, "sequence:   {}", parts.sequence);
    Ok(out)
}
