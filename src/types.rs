//! # Common Types
//!
//! This module contains the typed records shared by the analysis, fetching and
//! plotting layers: contributor activity, activity periods, count samples,
//! branch ages and the GitHub issue/release shapes.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct commit dates per contributor.
///
/// Keys are contributor identities after alias resolution. Only contributors
/// with at least one recorded date are ever present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContributorActivity {
    dates: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl ContributorActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commit date for a contributor. Duplicate dates collapse.
    pub fn record(&mut self, contributor: impl Into<String>, date: NaiveDate) {
        self.dates.entry(contributor.into()).or_default().insert(date);
    }

    /// Iterate contributors and their date sets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<NaiveDate>)> {
        self.dates.iter()
    }

    pub fn dates_for(&self, contributor: &str) -> Option<&BTreeSet<NaiveDate>> {
        self.dates.get(contributor)
    }

    pub fn contributor_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, NaiveDate)> for ContributorActivity {
    fn from_iter<T: IntoIterator<Item = (S, NaiveDate)>>(iter: T) -> Self {
        let mut activity = Self::new();
        for (contributor, date) in iter {
            activity.record(contributor, date);
        }
        activity
    }
}

/// A continuous run of activity for one contributor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityPeriod {
    /// First commit date of the run
    pub start_date: NaiveDate,
    /// Display end, padded to the minimum period width
    pub end_date: NaiveDate,
    /// Days from start to the last raw commit date, inclusive
    pub actual_span_days: i64,
}

/// Activity periods per contributor, each list in chronological order.
pub type PeriodsByContributor = BTreeMap<String, Vec<ActivityPeriod>>;

/// Number of active contributors at a boundary date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContributorCountSample {
    pub date: NaiveDate,
    pub count: usize,
}

/// Lifetime of a remote release branch, from its fork point to its newest commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchAge {
    /// Remote branch name, e.g. `origin/release-7.0`
    pub name: String,
    /// Short id of the merge-base commit with the main branch
    pub fork_commit: String,
    pub fork_date: DateTime<FixedOffset>,
    pub latest_commit_date: DateTime<FixedOffset>,
    pub age_days: i64,
}

/// A GitHub issue as returned by the REST issues endpoint.
///
/// The endpoint also returns pull requests; those carry a `pull_request` object.
#[derive(Clone, Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A GitHub release as returned by the REST releases endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// Days between one release's publication and the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleasePeriod {
    pub tag_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Number of open issues on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenIssueSample {
    pub date: NaiveDate,
    pub open: usize,
}

impl std::fmt::Display for BranchAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Branch: {}\n\tLatest commit date: {}\n\tFork date: {}\n\tFork commit: {}\n\tAge: {} days",
            self.name, self.latest_commit_date, self.fork_date, self.fork_commit, self.age_days
        )
    }
}
