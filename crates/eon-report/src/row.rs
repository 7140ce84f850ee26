//! Plain data rows written by the reporter.

use eon_sim::{ClassCounters, MetricsSnapshot};

/// One CSV row: the counters of one (sample instant, ISP, class) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub at_secs:                   f64,
    pub isp:                       u16,
    /// `"datapath"` or `"migration"`.
    pub class:                     &'static str,
    pub arrivals:                  u64,
    pub admitted:                  u64,
    pub completed:                 u64,
    pub rerouted:                  u64,
    pub disrupted:                 u64,
    pub blocked_no_path:           u64,
    pub blocked_no_window:         u64,
    pub blocked_no_safe_path:      u64,
    pub blocked_admission_refused: u64,
    pub migration_gbits:           f64,
}

impl SnapshotRow {
    fn from_counters(at_secs: f64, isp: u16, class: &'static str, c: &ClassCounters) -> Self {
        Self {
            at_secs,
            isp,
            class,
            arrivals:                  c.arrivals,
            admitted:                  c.admitted,
            completed:                 c.completed,
            rerouted:                  c.rerouted,
            disrupted:                 c.disrupted,
            blocked_no_path:           c.blocked_no_path,
            blocked_no_window:         c.blocked_no_window,
            blocked_no_safe_path:      c.blocked_no_safe_path,
            blocked_admission_refused: c.blocked_admission_refused,
            migration_gbits:           c.migration_gbits,
        }
    }
}

/// Flatten a snapshot into rows, one per (ISP, class), ISPs ascending.
pub fn rows(snapshot: &MetricsSnapshot) -> Vec<SnapshotRow> {
    let mut out = Vec::with_capacity(snapshot.isps.len() * 2);
    for (i, isp) in snapshot.isps.iter().enumerate() {
        let isp_id = i as u16;
        out.push(SnapshotRow::from_counters(
            snapshot.at_secs,
            isp_id,
            "datapath",
            &isp.datapath,
        ));
        out.push(SnapshotRow::from_counters(
            snapshot.at_secs,
            isp_id,
            "migration",
            &isp.migration,
        ));
    }
    out
}
