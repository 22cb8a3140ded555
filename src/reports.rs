//! The four report pipelines: collect records, reshape them into series, chart them.

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::analysis::{
    aggregate_counts_by_date, collect_contributor_activity_async, compute_branch_ages_async,
    load_issues, load_releases, open_issue_series, release_periods, retain_min_contribution,
    ActivityPeriodAggregator, BranchAgeOptions, HistoryFilter, Mailmap,
};
use crate::cli::{BranchAgeArgs, ContributorsArgs, FetchIssuesArgs, OpenIssuesArgs};
use crate::error::Result;
use crate::github::{save_json, GitHubClient};
use crate::plotting::{
    plot_branch_ages, plot_contributor_activity, plot_contributor_count, plot_open_issues,
    ChartStyle, ChartTheme,
};

/// Release branch age report. Prints a summary per branch and saves the chart.
pub async fn branch_age(args: BranchAgeArgs, theme: &ChartTheme, style: &ChartStyle) -> Result<()> {
    info!("Starting branch age calculation");
    let options = BranchAgeOptions {
        branch_pattern: args.branch_regex,
        main_branch: args.main_branch,
        include_zero_age: args.include_zero_age,
        fetch: !args.no_fetch,
    };

    let ages = compute_branch_ages_async(args.repo_path, options).await?;
    if ages.is_empty() {
        error!("No valid branch data found. Exiting.");
        return Ok(());
    }

    info!("Calculating branch ages");
    for age in &ages {
        println!("{}", age);
    }
    plot_branch_ages(&ages, &args.output_file, theme, style)
}

/// Contributor activity and contributor count reports.
pub async fn contributors(
    args: ContributorsArgs,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<()> {
    info!("Starting contributor activity analysis");
    let mailmap = Mailmap::load(&args.repo_path)?;
    let filter = HistoryFilter {
        branch: args.branch,
        since: (args.delta_days > 0).then(|| Utc::now() - Duration::days(i64::from(args.delta_days))),
        exclusions: args.exclusions,
    };

    let activity = collect_contributor_activity_async(args.repo_path, filter, mailmap).await?;
    let aggregator = ActivityPeriodAggregator::new(
        Duration::days(i64::from(args.window_days)),
        i64::from(args.granularity_days),
    );
    let mut periods = aggregator.group_into_periods(&activity);
    retain_min_contribution(&mut periods, i64::from(args.contribution_duration));
    info!(
        "{} of {} contributors kept after the contribution filter",
        periods.len(),
        activity.contributor_count()
    );

    for (contributor, list) in &periods {
        println!("Contributor: {}", contributor);
        for period in list {
            println!(
                "  Activity period: {} to {}. Duration: {}",
                period.start_date, period.end_date, period.actual_span_days
            );
        }
    }

    plot_contributor_activity(&periods, &args.activity_plot_file, args.less_than_year, theme, style)?;

    let counts = aggregate_counts_by_date(&periods);
    plot_contributor_count(&counts, &args.contributor_count_plot_file, theme, style)
}

/// Download bug issues and releases and save them as JSON.
pub async fn fetch_issues(args: FetchIssuesArgs) -> Result<()> {
    let client = GitHubClient::new(args.token.as_deref())?;

    info!("Fetching issues...");
    let issues = client
        .fetch_all(&args.repo, "issues", &[("state", "all"), ("labels", args.label.as_str())])
        .await?;
    save_json(&args.issues_file, &issues)?;
    info!("{} issues saved to '{}'.", issues.len(), args.issues_file.display());

    info!("Fetching releases...");
    let releases = client.fetch_all(&args.repo, "releases", &[]).await?;
    save_json(&args.releases_file, &releases)?;
    info!("{} releases saved to '{}'.", releases.len(), args.releases_file.display());

    Ok(())
}

/// Open issue count chart from previously fetched JSON.
pub fn open_issues(args: OpenIssuesArgs, theme: &ChartTheme, style: &ChartStyle) -> Result<()> {
    let issues = load_issues(&args.issues_file)?;
    let releases = load_releases(&args.releases_file)?;
    info!("Loaded {} issues and {} releases", issues.len(), releases.len());

    let series = open_issue_series(&issues);
    let until = series
        .last()
        .map(|sample| sample.date)
        .unwrap_or_else(|| Utc::now().date_naive());
    let periods = release_periods(&releases, until);

    plot_open_issues(&series, &periods, &args.output_file, theme, style)
}
