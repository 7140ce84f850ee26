//! `eon-report` — CSV time-series output for eon simulation runs.
//!
//! | Module    | Contents                                      |
//! |-----------|-----------------------------------------------|
//! | [`row`]   | `SnapshotRow` + snapshot flattening           |
//! | [`csv`]   | `CsvReporter` — `SimObserver` → CSV backend   |
//! | [`error`] | `ReportError`, `ReportResult<T>`              |

pub mod csv;
pub mod error;
pub mod row;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crate::csv::CsvReporter;
pub use error::{ReportError, ReportResult};
pub use row::{rows, SnapshotRow};
