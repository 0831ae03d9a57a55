//! Structured activity log (`~/.nectar/activity.jsonl`).
//!
//! One JSON line per backend call, plus free-form `note` lines for
//! diagnostics that have no user-facing surface (a failed session check,
//! a history list that could not be loaded). Logging is best-effort: a
//! write failure never interrupts a coordinator.
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    /// `"call"` or `"note"`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Route template, e.g. `/api/history/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActivityEntry {
    pub fn is_failure(&self) -> bool {
        self.kind == "call" && self.outcome.as_deref() != Some("ok")
    }
}

/// Handle to the activity log file. `None` path means logging is off.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    path: Option<PathBuf>,
}

impl ActivityLog {
    pub fn from_config(config: &LoggingConfig) -> Self {
        if config.enabled {
            Self {
                path: default_log_path(),
            }
        } else {
            Self::disabled()
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record the result of one backend call.
    pub fn record_call(
        &self,
        method: &str,
        endpoint: &str,
        status: Option<u16>,
        outcome: &str,
        latency_ms: u64,
    ) {
        self.append(&ActivityEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind: "call".to_string(),
            method: Some(method.to_string()),
            endpoint: Some(endpoint.to_string()),
            status,
            outcome: Some(outcome.to_string()),
            latency_ms: Some(latency_ms),
            message: None,
        });
    }

    /// Record a diagnostic message.
    pub fn note(&self, message: &str) {
        self.append(&ActivityEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind: "note".to_string(),
            method: None,
            endpoint: None,
            status: None,
            outcome: None,
            latency_ms: None,
            message: Some(message.to_string()),
        });
    }

    fn append(&self, entry: &ActivityEntry) {
        let _ = self.try_append(entry);
    }

    fn try_append(&self, entry: &ActivityEntry) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_entries(&self) -> Vec<ActivityEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ActivityEntry>(&line).ok())
            .collect()
    }

    /// Entries from the last `days` days, or all of them.
    pub fn read_entries_since_days(&self, days: Option<u32>) -> Vec<ActivityEntry> {
        let entries = self.read_entries();
        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();
        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}

/// `~/.nectar/activity.jsonl`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".nectar").join("activity.jsonl"))
}

// ---------------------------------------------------------------------------
// Aggregation for `nectar activity`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub calls: usize,
    pub failures: usize,
    pub avg_latency_ms: f64,
}

/// Per-endpoint call counts, busiest first.
pub fn summarize(entries: &[ActivityEntry]) -> Vec<EndpointSummary> {
    let mut by_endpoint: BTreeMap<String, (usize, usize, u64)> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.kind == "call") {
        let key = format!(
            "{} {}",
            entry.method.as_deref().unwrap_or("?"),
            entry.endpoint.as_deref().unwrap_or("?")
        );
        let slot = by_endpoint.entry(key).or_default();
        slot.0 += 1;
        if entry.is_failure() {
            slot.1 += 1;
        }
        slot.2 += entry.latency_ms.unwrap_or(0);
    }

    let mut out: Vec<EndpointSummary> = by_endpoint
        .into_iter()
        .map(|(endpoint, (calls, failures, total_ms))| EndpointSummary {
            endpoint,
            calls,
            failures,
            avg_latency_ms: total_ms as f64 / calls as f64,
        })
        .collect();
    out.sort_by(|a, b| b.calls.cmp(&a.calls).then_with(|| a.endpoint.cmp(&b.endpoint)));
    out
}
