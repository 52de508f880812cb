//! Descriptive statistics over a normalized activity table.
//!
//! Every statistic is independent: a missing column logs an error and yields
//! a neutral result for that statistic only.

use std::collections::{HashMap, HashSet};

use activity_core::data_processors::normalize;
use activity_core::models::{
    ActivityTable, Value, ACTIVITY_TYPE, SESSION_DURATION, USERNAME, USER_ID,
};
use serde::Serialize;
use tracing::{error, info};

// ── Result rows ───────────────────────────────────────────────────────────────

/// Number of records attributed to one username.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSessionCount {
    pub username: String,
    pub sessions: usize,
}

/// Mean session duration for one username.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAverageDuration {
    pub username: String,
    pub average_duration: f64,
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// Read-only statistics over one normalized [`ActivityTable`].
pub struct ActivityAggregator {
    table: ActivityTable,
}

impl ActivityAggregator {
    /// Normalize `table` and hold the result. The caller's table is untouched.
    pub fn new(table: &ActivityTable) -> Self {
        Self {
            table: normalize(table),
        }
    }

    /// The normalized table the statistics are computed over.
    pub fn table(&self) -> &ActivityTable {
        &self.table
    }

    /// Count of distinct non-missing `user_id` values; `0` without the column.
    ///
    /// Ids are opaque text, so `1` and `01` are two different users.
    pub fn total_users(&self) -> usize {
        let Ok(ids) = self.table.column(USER_ID) else {
            error!("Column '{}' not found in table", USER_ID);
            return 0;
        };

        let distinct: HashSet<String> = ids
            .filter(|v| !v.is_missing())
            .map(Value::to_string)
            .collect();
        info!("Total unique users: {}", distinct.len());
        distinct.len()
    }

    /// Number of rows per username, in order of first appearance.
    ///
    /// Rows with a missing username are not counted.
    pub fn total_sessions_per_user(&self) -> Vec<UserSessionCount> {
        let Ok(names) = self.table.column(USERNAME) else {
            error!("Column '{}' not found in table", USERNAME);
            return Vec::new();
        };

        let mut order: Vec<UserSessionCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for name in names.filter(|v| !v.is_missing()) {
            let key = name.to_string();
            match index.get(&key) {
                Some(&i) => order[i].sessions += 1,
                None => {
                    index.insert(key.clone(), order.len());
                    order.push(UserSessionCount {
                        username: key,
                        sessions: 1,
                    });
                }
            }
        }

        info!("Calculated total sessions per user ({} users)", order.len());
        order
    }

    /// Mean `session_duration` per username, in order of first appearance.
    ///
    /// Rows whose duration is missing are dropped before grouping, so a user
    /// with no valid durations does not appear at all.
    pub fn average_session_duration_per_user(&self) -> Vec<UserAverageDuration> {
        let (user_idx, duration_idx) = match (
            self.table.column_index(USERNAME),
            self.table.column_index(SESSION_DURATION),
        ) {
            (Ok(u), Ok(d)) => (u, d),
            (u, d) => {
                let missing: Vec<&str> = [(u.is_err(), USERNAME), (d.is_err(), SESSION_DURATION)]
                    .into_iter()
                    .filter_map(|(absent, name)| absent.then_some(name))
                    .collect();
                error!("Missing expected column(s) in table: {}", missing.join(", "));
                return Vec::new();
            }
        };

        let mut order: Vec<(String, f64, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in self.table.rows() {
            let Some(duration) = row[duration_idx].as_number() else {
                continue;
            };
            if row[user_idx].is_missing() {
                continue;
            }
            let key = row[user_idx].to_string();
            let i = *index.entry(key.clone()).or_insert_with(|| {
                order.push((key, 0.0, 0));
                order.len() - 1
            });
            order[i].1 += duration;
            order[i].2 += 1;
        }

        let averages: Vec<UserAverageDuration> = order
            .into_iter()
            .map(|(username, sum, count)| UserAverageDuration {
                username,
                average_duration: sum / count as f64,
            })
            .collect();
        info!(
            "Calculated average session duration per user ({} users)",
            averages.len()
        );
        averages
    }

    /// The `activity_type` with the most rows.
    ///
    /// Ties go to the smallest of the tied values in lexicographic order.
    /// Returns `None` when the column is absent or holds no non-missing values.
    pub fn most_common_activity_type(&self) -> Option<String> {
        let Ok(activities) = self.table.column(ACTIVITY_TYPE) else {
            error!("Column '{}' missing or empty", ACTIVITY_TYPE);
            return None;
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for activity in activities.filter(|v| !v.is_missing()) {
            *counts.entry(activity.to_string()).or_default() += 1;
        }

        let most_common = counts
            .into_iter()
            .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
            .map(|(value, _)| value);

        match &most_common {
            Some(activity) => info!("Most common activity type: {}", activity),
            None => error!("Column '{}' missing or empty", ACTIVITY_TYPE),
        }
        most_common
    }

    /// Largest non-missing `session_duration`, or `None`.
    pub fn longest_session_recorded(&self) -> Option<f64> {
        let Ok(durations) = self.table.column(SESSION_DURATION) else {
            error!("Column '{}' not found", SESSION_DURATION);
            return None;
        };

        let longest = durations
            .filter_map(Value::as_number)
            .fold(None::<f64>, |max, d| Some(max.map_or(d, |m| m.max(d))));

        match longest {
            Some(d) => info!("Longest session recorded: {}", d),
            None => info!("Longest session recorded: none (no valid durations)"),
        }
        longest
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
