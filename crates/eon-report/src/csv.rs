//! CSV reporting backend.
//!
//! `CsvReporter` bridges [`SimObserver`] to one CSV file of metric
//! time-series rows: every periodic snapshot contributes one row per
//! (ISP, class), and a final snapshot is appended when the run ends.
//!
//! Observer methods have no return value, so write errors are latched
//! internally; call [`take_error`](CsvReporter::take_error) after
//! `sim.run()` returns.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use eon_core::SimTime;
use eon_sim::{Metrics, MetricsSnapshot, SimObserver};

use crate::error::{ReportError, ReportResult};
use crate::row::{rows, SnapshotRow};

const HEADER: [&str; 13] = [
    "at_secs",
    "isp",
    "class",
    "arrivals",
    "admitted",
    "completed",
    "rerouted",
    "disrupted",
    "blocked_no_path",
    "blocked_no_window",
    "blocked_no_safe_path",
    "blocked_admission_refused",
    "migration_gbits",
];

/// Writes snapshot rows to a single CSV file.
pub struct CsvReporter {
    writer:     Writer<File>,
    last_error: Option<ReportError>,
    finished:   bool,
}

impl CsvReporter {
    /// Create (or truncate) the CSV file at `path` and write the header.
    pub fn new(path: &Path) -> ReportResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        Ok(Self { writer, last_error: None, finished: false })
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<ReportError> {
        self.last_error.take()
    }

    fn write_snapshot(&mut self, snapshot: &MetricsSnapshot) -> ReportResult<()> {
        for row in rows(snapshot) {
            self.write_row(&row)?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &SnapshotRow) -> ReportResult<()> {
        self.writer.write_record(&[
            row.at_secs.to_string(),
            row.isp.to_string(),
            row.class.to_string(),
            row.arrivals.to_string(),
            row.admitted.to_string(),
            row.completed.to_string(),
            row.rerouted.to_string(),
            row.disrupted.to_string(),
            row.blocked_no_path.to_string(),
            row.blocked_no_window.to_string(),
            row.blocked_no_safe_path.to_string(),
            row.blocked_admission_refused.to_string(),
            row.migration_gbits.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }

    fn store_err(&mut self, result: ReportResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for CsvReporter {
    fn on_snapshot(&mut self, snapshot: &MetricsSnapshot) {
        let result = self.write_snapshot(snapshot);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, now: SimTime, metrics: &Metrics) {
        let final_snapshot = metrics.snapshot(now);
        let result = self
            .write_snapshot(&final_snapshot)
            .and_then(|()| self.finish());
        self.store_err(result);
    }
}
