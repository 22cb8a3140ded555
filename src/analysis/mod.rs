pub mod activity;
pub mod git;
pub mod issues;
mod mailmap;


pub use activity::{aggregate_counts_by_date, retain_min_contribution, ActivityPeriodAggregator};
pub use git::{
    collect_contributor_activity, collect_contributor_activity_async, compute_branch_ages,
    compute_branch_ages_async, BranchAgeOptions, HistoryFilter,
};
pub use issues::{load_issues, load_releases, open_issue_series, release_periods};
pub use mailmap::Mailmap;
