use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::types::{Issue, OpenIssueSample, Release, ReleasePeriod};

/// Read issues saved by the fetch command.
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Read releases saved by the fetch command.
pub fn load_releases(path: &Path) -> Result<Vec<Release>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Daily count of open issues, from the first creation date through the last
/// creation or closing date.
///
/// An issue is open on a day when it was created on or before that day and is
/// either still open or closed after it. Pull requests are ignored.
pub fn open_issue_series(issues: &[Issue]) -> Vec<OpenIssueSample> {
    let mut deltas: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for issue in issues.iter().filter(|issue| !issue.is_pull_request()) {
        *deltas.entry(issue.created_at.date_naive()).or_insert(0) += 1;
        if let Some(closed) = issue.closed_at {
            *deltas.entry(closed.date_naive()).or_insert(0) -= 1;
        }
    }

    let (Some(&first), Some(&last)) = (deltas.keys().next(), deltas.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::with_capacity((last - first).num_days() as usize + 1);
    let mut open = 0i64;
    let mut day = first;
    while day <= last {
        open += deltas.get(&day).copied().unwrap_or(0);
        series.push(OpenIssueSample {
            date: day,
            open: open.max(0) as usize,
        });
        day += Duration::days(1);
    }
    series
}

/// Periods between consecutive published releases.
///
/// Drafts and unpublished releases are skipped. The newest release's period
/// runs until `until`.
pub fn release_periods(releases: &[Release], until: NaiveDate) -> Vec<ReleasePeriod> {
    let mut published: Vec<(NaiveDate, &str)> = releases
        .iter()
        .filter(|release| !release.draft)
        .filter_map(|release| {
            release
                .published_at
                .map(|at| (at.date_naive(), release.tag_name.as_str()))
        })
        .collect();
    published.sort();

    published
        .iter()
        .enumerate()
        .map(|(i, &(start_date, tag_name))| {
            let end_date = published
                .get(i + 1)
                .map(|&(next, _)| next)
                .unwrap_or(until)
                .max(start_date);
            ReleasePeriod {
                tag_name: tag_name.to_string(),
                start_date,
                end_date,
            }
        })
        .collect()
}
