//! Observability - JSONL event log for harness runs.
//!
//! Each scenario appends one `case_<outcome>` line per case followed by a
//! `scenario_finished` line. `gridcheck events` reads the log back.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::runner::{CaseRecord, ScenarioResult};

/// One line of the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub scenario: Option<String>,
    pub message: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl HarnessEvent {
    fn for_case(scenario: &str, case: &CaseRecord, at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            timestamp: at,
            event_type: format!("case_{}", case.outcome.label()),
            scenario: Some(scenario.to_string()),
            message: case.describe(),
            metadata: serde_json::to_value(case)?,
        })
    }

    fn for_scenario(result: &ScenarioResult, at: DateTime<Utc>) -> Self {
        let verdict = if result.passed() { "PASSED!" } else { "FAILED!" };
        Self {
            timestamp: at,
            event_type: "scenario_finished".to_string(),
            scenario: Some(result.name.clone()),
            message: format!("{verdict} {}", result.name),
            metadata: serde_json::json!({
                "correct": result.correct_count,
                "total": result.total_count,
            }),
        }
    }
}

/// Append-only JSONL log at a fixed path.
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a scenario's case events and its summary in one write.
    pub fn emit_scenario(&self, result: &ScenarioResult) -> Result<()> {
        let at = Utc::now();
        let mut batch = result
            .cases
            .iter()
            .map(|case| HarnessEvent::for_case(&result.name, case, at))
            .collect::<Result<Vec<_>>>()?;
        batch.push(HarnessEvent::for_scenario(result, at));
        self.append(&batch)
    }

    fn append(&self, events: &[HarnessEvent]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut out = BufWriter::new(file);
        for event in events {
            serde_json::to_writer(&mut out, event)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    /// The last `limit` events, optionally only those of one scenario. A missing log
    /// is empty; a line that is not an event is an error naming its line number.
    pub fn tail(&self, limit: usize, scenario: Option<&str>) -> Result<Vec<HarnessEvent>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let mut events = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: HarnessEvent = serde_json::from_str(line).with_context(|| {
                format!("{}:{}: not a harness event", self.path.display(), line_no + 1)
            })?;
            if scenario.map_or(true, |name| event.scenario.as_deref() == Some(name)) {
                events.push(event);
            }
        }

        let skip = events.len().saturating_sub(limit);
        Ok(events.split_off(skip))
    }
}
