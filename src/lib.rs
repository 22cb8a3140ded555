//! # Git Repository Reports
//!
//! `gitreports` turns git history and GitHub issue data into charts:
//!
//! - Release branch ages measured from the point they forked off main
//! - Contributor activity periods, grouped from distinct commit dates
//! - Number of active contributors over time
//! - Open bug issues over time with release periods overlaid
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Duration;
//! use gitreports::analysis::{aggregate_counts_by_date, ActivityPeriodAggregator};
//! use gitreports::types::ContributorActivity;
//!
//! let activity: ContributorActivity = vec![
//!     ("alice", chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
//!     ("bob", chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
//! ]
//! .into_iter()
//! .collect();
//!
//! let periods = ActivityPeriodAggregator::new(Duration::days(90), 15).group_into_periods(&activity);
//! let counts = aggregate_counts_by_date(&periods);
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod github;
pub mod logging;
pub mod plotting;
pub mod reports;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::ActivityPeriodAggregator;
pub use error::{ReportError, Result};
pub use types::{ActivityPeriod, BranchAge, ContributorActivity, ContributorCountSample};
