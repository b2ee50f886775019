//! Batch reports and serializable views of loader state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::logs::LogEntry;
use crate::models::{Car, Drone};
use crate::validation::DataError;

/// What one call to [`super::FleetLoader::ingest`] added.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Records seen in the batch
    pub records: usize,
    pub cars_added: usize,
    pub drones_added: usize,
    pub errors_added: usize,
    /// Records that produced no entity
    pub rejected: usize,
    /// Progress lines produced while ingesting the batch
    pub log: Vec<LogEntry>,
}

impl IngestReport {
    pub(crate) fn start(records: usize) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            started_at: Utc::now(),
            records,
            cars_added: 0,
            drones_added: 0,
            errors_added: 0,
            rejected: 0,
            log: Vec::new(),
        }
    }

    /// Emit a progress line and keep it on the report.
    pub(crate) fn push_log(&mut self, entry: LogEntry) {
        entry.emit();
        self.log.push(entry);
    }

    /// True when the batch added no data errors.
    pub fn is_clean(&self) -> bool {
        self.errors_added == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Ingested {} records: {} cars, {} drones, {} rejected, {} errors",
            self.records, self.cars_added, self.drones_added, self.rejected, self.errors_added
        )
    }
}

/// Running totals held by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub cars: usize,
    pub drones: usize,
    pub errors: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded: {} cars, {} drones, {} errors",
            self.cars, self.drones, self.errors
        )
    }
}

/// Borrowed view of everything a loader holds, ready for JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary: LoadSummary,
    pub cars: &'a [Car],
    pub drones: &'a [Drone],
    pub errors: &'a [DataError],
}
