//! Lead dashboard metrics over the full-list report.

use crate::domain::model::{cell_text, LeadTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MODE_COLUMN: &str = "mode";
pub const STATUS_COLUMN: &str = "status";
pub const LAST_EMAIL_COLUMN: &str = "last email";
pub const REPLIED_STATUS: &str = "Replied";

/// Selected values per filterable column. `None` selects every non-null value.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub modes: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub filtered: LeadTable,
    pub replied: usize,
    pub mode_counts: Vec<(String, usize)>,
    pub status_counts: Vec<(String, usize)>,
    /// Emails per UTC hour; `None` when the report has no `last email` column.
    pub email_activity: Option<Vec<(String, usize)>>,
}

/// Distinct non-null values of a column, first-seen order.
pub fn distinct_values(table: &LeadTable, column: &str) -> Vec<String> {
    let mut seen = Vec::new();
    if let Some(values) = table.column_values(column) {
        for value in values.filter(|v| !v.is_null()) {
            let text = cell_text(value);
            if !seen.contains(&text) {
                seen.push(text);
            }
        }
    }
    seen
}

pub fn summarize(table: &LeadTable, filter: &DashboardFilter) -> DashboardSummary {
    let mode_sel = selection(table, MODE_COLUMN, filter.modes.as_ref());
    let status_sel = selection(table, STATUS_COLUMN, filter.statuses.as_ref());

    let keep: Vec<usize> = (0..table.len())
        .filter(|&row| {
            matches_selection(table, row, MODE_COLUMN, mode_sel.as_deref())
                && matches_selection(table, row, STATUS_COLUMN, status_sel.as_deref())
        })
        .collect();

    let filtered = LeadTable::from_parts(
        table.columns().to_vec(),
        keep.iter().map(|&i| table.rows()[i].clone()).collect(),
    );

    let replied = filtered
        .column_values(STATUS_COLUMN)
        .map(|values| values.filter(|v| v.as_str() == Some(REPLIED_STATUS)).count())
        .unwrap_or(0);

    DashboardSummary {
        total: table.len(),
        replied,
        mode_counts: value_counts(&filtered, MODE_COLUMN),
        status_counts: value_counts(&filtered, STATUS_COLUMN),
        email_activity: hourly_activity(&filtered, LAST_EMAIL_COLUMN),
        filtered,
    }
}

fn selection(table: &LeadTable, column: &str, chosen: Option<&Vec<String>>) -> Option<Vec<String>> {
    table.column_index(column)?;
    Some(match chosen {
        Some(values) => values.clone(),
        None => distinct_values(table, column),
    })
}

fn matches_selection(table: &LeadTable, row: usize, column: &str, selected: Option<&[String]>) -> bool {
    let Some(selected) = selected else {
        return true;
    };
    match table.get(row, column) {
        Some(Value::Null) | None => false,
        Some(value) => selected.contains(&cell_text(value)),
    }
}

/// Non-null value counts, highest first; ties keep first-seen order.
pub fn value_counts(table: &LeadTable, column: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    if let Some(values) = table.column_values(column) {
        for value in values.filter(|v| !v.is_null()) {
            let text = cell_text(value);
            match counts.iter_mut().find(|(k, _)| *k == text) {
                Some((_, n)) => *n += 1,
                None => counts.push((text, 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Parses a timestamp as UTC. Offsets are converted, naive values taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn hourly_activity(table: &LeadTable, column: &str) -> Option<Vec<(String, usize)>> {
    let values = table.column_values(column)?;
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();

    for value in values {
        let Some(ts) = value.as_str().and_then(parse_timestamp) else {
            continue;
        };
        *buckets.entry(ts.format("%Y-%m-%d %H:00").to_string()).or_default() += 1;
    }

    Some(buckets.into_iter().collect())
}
