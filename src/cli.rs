use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogConfig;
use crate::plotting::{ChartStyle, ChartTheme};

#[derive(Parser, Debug)]
#[command(name = "gitreports")]
#[command(about = "Chart release branch ages, contributor activity and open issues")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, default_value = "info", help = "Log filter, overridden by RUST_LOG")]
    pub log_level: String,

    #[arg(long, global = true, help = "Disable colored log output")]
    pub no_color: bool,

    #[arg(long, global = true, value_enum, default_value_t = Theme::Dark, help = "Chart color theme")]
    pub theme: Theme,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl CommonArgs {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            color: !self.no_color,
        }
    }

    pub fn chart_theme(&self) -> ChartTheme {
        match self.theme {
            Theme::Dark => ChartTheme::default(),
            Theme::Light => ChartTheme::light(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chart how long each release branch lived after forking from main
    BranchAge(BranchAgeArgs),
    /// Chart contributor activity periods and contributor counts over time
    Contributors(ContributorsArgs),
    /// Download issues and releases of a GitHub repository as JSON
    FetchIssues(FetchIssuesArgs),
    /// Chart open issues over time with release periods overlaid
    OpenIssues(OpenIssuesArgs),
}

#[derive(Args, Clone, Debug)]
pub struct BranchAgeArgs {
    #[arg(long, help = "Path to the repository")]
    pub repo_path: PathBuf,

    #[arg(long, default_value = "out/branch_ages.png", help = "File name for the branch age plot")]
    pub output_file: PathBuf,

    #[arg(long, default_value = ".+", help = "Regex matched at the start of remote branch names")]
    pub branch_regex: String,

    #[arg(long, default_value = "origin/main", help = "Branch the release branches fork from")]
    pub main_branch: String,

    #[arg(long, help = "Include branches with age 0 days")]
    pub include_zero_age: bool,

    #[arg(long, help = "Skip fetching all remotes first")]
    pub no_fetch: bool,
}

#[derive(Args, Clone, Debug)]
pub struct ContributorsArgs {
    #[arg(long, default_value = ".", help = "Path to the repository")]
    pub repo_path: PathBuf,

    #[arg(long, default_value = "main", help = "Branch to analyze")]
    pub branch: String,

    #[arg(long, num_args = 0.., default_values = ["dependabot", "snyk"], help = "Contributors to exclude (substring match)")]
    pub exclusions: Vec<String>,

    #[arg(long, default_value_t = 365 * 30, help = "Number of days to look back for commits, 0 for all history")]
    pub delta_days: u32,

    #[arg(long, default_value_t = 90, help = "Largest gap in days within one activity period")]
    pub window_days: u32,

    #[arg(long, default_value_t = 15, help = "Minimum displayed length of an activity period in days")]
    pub granularity_days: u32,

    #[arg(long, default_value_t = 1, help = "Minimum total contribution in days to keep a contributor")]
    pub contribution_duration: u32,

    #[arg(long, help = "Use monthly date ticks on the activity plot")]
    pub less_than_year: bool,

    #[arg(long, default_value = "out/activity_plot.png", help = "File name for the activity plot")]
    pub activity_plot_file: PathBuf,

    #[arg(long, default_value = "out/contributor_count_plot.png", help = "File name for the contributor count plot")]
    pub contributor_count_plot_file: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct FetchIssuesArgs {
    #[arg(long, default_value = "Tribler/tribler", help = "GitHub repository as owner/repo")]
    pub repo: String,

    #[arg(long, default_value = "out/issues.json", help = "File to save issues data")]
    pub issues_file: PathBuf,

    #[arg(long, default_value = "out/releases.json", help = "File to save releases data")]
    pub releases_file: PathBuf,

    #[arg(long, default_value = "type: bug", help = "Only fetch issues with this label")]
    pub label: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub API token")]
    pub token: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct OpenIssuesArgs {
    #[arg(long, default_value = "out/issues.json", help = "Issues saved by fetch-issues")]
    pub issues_file: PathBuf,

    #[arg(long, default_value = "out/releases.json", help = "Releases saved by fetch-issues")]
    pub releases_file: PathBuf,

    #[arg(long, default_value = "out/open_issues.png", help = "File name for the open issues plot")]
    pub output_file: PathBuf,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub async fn execute(self) -> Result<()> {
        let theme = self.common.chart_theme();
        let style = ChartStyle::default();
        match self.command {
            Commands::BranchAge(args) => crate::reports::branch_age(args, &theme, &style).await?,
            Commands::Contributors(args) => {
                crate::reports::contributors(args, &theme, &style).await?
            }
            Commands::FetchIssues(args) => crate::reports::fetch_issues(args).await?,
            Commands::OpenIssues(args) => crate::reports::open_issues(args, &theme, &style)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contributors_defaults() {
        let cli = Cli::try_parse_from(["gitreports", "contributors"]).unwrap();
        let Commands::Contributors(args) = cli.command else {
            panic!("expected contributors command");
        };
        assert_eq!(args.repo_path, PathBuf::from("."));
        assert_eq!(args.branch, "main");
        assert_eq!(args.exclusions, vec!["dependabot", "snyk"]);
        assert_eq!(args.delta_days, 10_950);
        assert_eq!(args.window_days, 90);
        assert_eq!(args.granularity_days, 15);
        assert_eq!(args.contribution_duration, 1);
        assert!(!args.less_than_year);
    }

    #[test]
    fn test_branch_age_requires_repo_path() {
        assert!(Cli::try_parse_from(["gitreports", "branch-age"]).is_err());

        let cli = Cli::try_parse_from([
            "gitreports",
            "branch-age",
            "--repo-path",
            "/tmp/repo",
            "--branch-regex",
            "origin/release",
            "--no-fetch",
        ])
        .unwrap();
        let Commands::BranchAge(args) = cli.command else {
            panic!("expected branch-age command");
        };
        assert_eq!(args.branch_regex, "origin/release");
        assert_eq!(args.output_file, PathBuf::from("out/branch_ages.png"));
        assert!(args.no_fetch);
        assert!(!args.include_zero_age);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gitreports",
            "open-issues",
            "--no-color",
            "--theme",
            "light",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let log = cli.common.log_config();
        assert_eq!(log.level, "debug");
        assert!(!log.color);
        assert_eq!(cli.common.theme, Theme::Light);
    }

    #[test]
    fn test_empty_exclusions() {
        let cli = Cli::try_parse_from(["gitreports", "contributors", "--exclusions"]).unwrap();
        let Commands::Contributors(args) = cli.command else {
            panic!("expected contributors command");
        };
        assert!(args.exclusions.is_empty());
    }
}
