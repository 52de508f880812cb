//! Summary pipeline: load, normalize, and run every statistic once.

use std::path::Path;

use activity_core::error::Result;
use activity_core::models::ActivityTable;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{ActivityAggregator, UserAverageDuration, UserSessionCount};
use crate::reader::load_table;

/// All five statistics for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    /// Rows in the source table.
    pub records: usize,
    pub total_users: usize,
    pub sessions_per_user: Vec<UserSessionCount>,
    pub average_duration_per_user: Vec<UserAverageDuration>,
    pub most_common_activity_type: Option<String>,
    pub longest_session: Option<f64>,
}

impl ActivitySummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compute every statistic over `table`. A statistic whose column is absent
/// takes its neutral value; the others are unaffected.
pub fn summarize(table: &ActivityTable) -> ActivitySummary {
    let aggregator = ActivityAggregator::new(table);
    ActivitySummary {
        records: table.len(),
        total_users: aggregator.total_users(),
        sessions_per_user: aggregator.total_sessions_per_user(),
        average_duration_per_user: aggregator.average_session_duration_per_user(),
        most_common_activity_type: aggregator.most_common_activity_type(),
        longest_session: aggregator.longest_session_recorded(),
    }
}

/// Load `path` and [`summarize`] it.
pub fn summarize_file(path: &Path) -> Result<ActivitySummary> {
    let table = load_table(path)?;
    let summary = summarize(&table);
    debug!("Summarized {} records from {}", summary.records, path.display());
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
