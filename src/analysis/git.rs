use chrono::{DateTime, FixedOffset, Utc};
use git2::{
    BranchType, Config, Cred, CredentialType, FetchOptions, Oid, RemoteCallbacks, Repository, Sort,
};
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

use super::mailmap::Mailmap;
use crate::error::Result;
use crate::types::{BranchAge, ContributorActivity};

const SECONDS_PER_DAY: i64 = 86_400;
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Which commits feed the contributor analysis.
#[derive(Clone, Debug)]
pub struct HistoryFilter {
    /// Branch to walk, resolved locally first, then as `origin/<branch>`
    pub branch: String,
    /// Ignore commits older than this
    pub since: Option<DateTime<Utc>>,
    /// Contributors whose key contains any of these substrings are skipped
    pub exclusions: Vec<String>,
}

impl HistoryFilter {
    fn is_excluded(&self, contributor: &str) -> bool {
        self.exclusions
            .iter()
            .any(|exclusion| contributor.contains(exclusion.as_str()))
    }
}

/// Options for the release branch age report.
#[derive(Clone, Debug)]
pub struct BranchAgeOptions {
    /// Pattern matched against the start of each remote branch name
    pub branch_pattern: String,
    /// Branch the release branches fork from
    pub main_branch: String,
    pub include_zero_age: bool,
    /// Fetch every remote before listing branches
    pub fetch: bool,
}

impl Default for BranchAgeOptions {
    fn default() -> Self {
        Self {
            branch_pattern: ".+".to_string(),
            main_branch: "origin/main".to_string(),
            include_zero_age: false,
            fetch: true,
        }
    }
}

/// Collect contributor commit dates asynchronously
pub async fn collect_contributor_activity_async(
    repo_path: PathBuf,
    filter: HistoryFilter,
    mailmap: Mailmap,
) -> Result<ContributorActivity> {
    // git2 operations are blocking
    spawn_blocking(move || collect_contributor_activity(&repo_path, &filter, &mailmap)).await?
}

/// Walk a branch and record the distinct commit dates of every contributor.
///
/// Dates are the committer's local calendar dates. The contributor key is the
/// mailmap name for the author email, or the author name when unmapped.
pub fn collect_contributor_activity(
    repo_path: &Path,
    filter: &HistoryFilter,
    mailmap: &Mailmap,
) -> Result<ContributorActivity> {
    let repo = Repository::open(repo_path)?;
    let head = resolve_branch(&repo, &filter.branch)?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push(head)?;
    revwalk.set_sorting(Sort::TIME)?;
    let commits = revwalk.collect::<std::result::Result<Vec<Oid>, _>>()?;

    let since = filter.since.map(|s| s.timestamp());
    let mut selected = Vec::with_capacity(commits.len());
    for oid in commits {
        let commit = repo.find_commit(oid)?;
        if since.map_or(true, |s| commit.time().seconds() >= s) {
            selected.push(commit);
        }
    }

    let total = selected.len();
    info!("Analyzing {} commits...", total);
    let progress_step = (total / 10).max(1);

    let mut activity = ContributorActivity::new();
    for (i, commit) in selected.iter().enumerate() {
        let processed = i + 1;
        let author = commit.author();
        let contributor = author
            .email()
            .and_then(|email| mailmap.resolve(email))
            .or_else(|| author.name())
            .unwrap_or("Unknown")
            .to_string();

        if filter.is_excluded(&contributor) {
            debug!("Skipping excluded contributor {}", contributor);
        } else if let Some(when) = commit_datetime(commit.time()) {
            activity.record(contributor, when.date_naive());
        }

        if processed % progress_step == 0 || processed == total {
            info!(
                "Processed {}/{} commits ({:.1}%)",
                processed,
                total,
                processed as f64 / total as f64 * 100.0
            );
        }
    }

    Ok(activity)
}

/// Compute release branch ages asynchronously
pub async fn compute_branch_ages_async(
    repo_path: PathBuf,
    options: BranchAgeOptions,
) -> Result<Vec<BranchAge>> {
    spawn_blocking(move || compute_branch_ages(&repo_path, &options)).await?
}

/// Measure how long each matching remote branch lived after forking from the main branch.
///
/// The fork point is the merge base of the branch and the oldest main-branch
/// commit the branch does not contain. Results are ordered newest first by
/// latest commit.
pub fn compute_branch_ages(repo_path: &Path, options: &BranchAgeOptions) -> Result<Vec<BranchAge>> {
    let repo = Repository::open(repo_path)?;
    // Match at the start of the name only
    let pattern = Regex::new(&format!("^(?:{})", options.branch_pattern))?;

    if options.fetch {
        fetch_all_remotes(&repo)?;
    }

    info!("Getting all release branches");
    let main = resolve_revision(&repo, &options.main_branch)?;
    let mut ages = Vec::new();

    for (name, tip) in remote_branches(&repo)? {
        if !pattern.is_match(&name) {
            continue;
        }

        info!("Finding oldest commit in {} not in {}", options.main_branch, name);
        let Some(oldest) = oldest_commit_not_in(&repo, main, tip)? else {
            warn!("No oldest commit found for branch {}. Skipping fork commit calculation.", name);
            continue;
        };

        let fork = match repo.merge_base(oldest, tip) {
            Ok(fork) => fork,
            Err(e) => {
                warn!("No fork commit for branch {}: {}", name, e);
                continue;
            }
        };

        let fork_commit = repo.find_commit(fork)?;
        let tip_commit = repo.find_commit(tip)?;
        let (Some(fork_date), Some(latest_commit_date)) = (
            commit_datetime(fork_commit.time()),
            commit_datetime(tip_commit.time()),
        ) else {
            warn!("Branch {} has commits with invalid timestamps. Skipping.", name);
            continue;
        };

        let age_days = (latest_commit_date - fork_date)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY);
        let short_id = fork_commit.as_object().short_id()?;

        let age = BranchAge {
            name,
            fork_commit: short_id.as_str().unwrap_or_default().to_string(),
            fork_date,
            latest_commit_date,
            age_days,
        };
        debug!("{}", age);

        if age.age_days > 0 || options.include_zero_age {
            ages.push(age);
        }
    }

    ages.sort_by(|a, b| b.latest_commit_date.cmp(&a.latest_commit_date));
    Ok(ages)
}

/// Fetch every remote. A remote that cannot be fetched is logged and its
/// existing remote-tracking refs are used as they are.
fn fetch_all_remotes(repo: &Repository) -> Result<()> {
    let config = repo.config()?;
    let remotes = repo.remotes()?;
    for name in remotes.iter().flatten() {
        info!("Fetching remote {}", name);
        let mut remote = repo.find_remote(name)?;
        let mut options = FetchOptions::new();
        options.remote_callbacks(credential_callbacks(&config));
        if let Err(e) = remote.fetch(&[] as &[&str], Some(&mut options), None) {
            warn!("Could not fetch remote {}: {}. Using existing refs.", name, e);
        }
    }
    Ok(())
}

/// Credentials from the SSH agent, then from the configured git credential helpers.
fn credential_callbacks(config: &Config) -> RemoteCallbacks<'_> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        // libgit2 keeps asking while credentials are rejected
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("no accepted credentials for remote"));
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            if let Some(user) = username {
                return Cred::ssh_key_from_agent(user);
            }
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return Cred::credential_helper(config, url, username);
        }
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username.unwrap_or("git"));
        }
        Cred::default()
    });
    callbacks
}

/// Remote branches with their tip commits, sorted by name. Symbolic refs such
/// as `origin/HEAD` are skipped.
fn remote_branches(repo: &Repository) -> Result<Vec<(String, Oid)>> {
    let mut branches = Vec::new();
    for (branch, _) in repo.branches(Some(BranchType::Remote))?.flatten() {
        let reference = branch.get();
        let (Some(tip), Ok(Some(name))) = (reference.target(), branch.name()) else {
            continue;
        };
        branches.push((name.to_string(), tip));
    }
    branches.sort();
    Ok(branches)
}

/// Oldest commit reachable from `from` but not from `excluded`.
fn oldest_commit_not_in(repo: &Repository, from: Oid, excluded: Oid) -> Result<Option<Oid>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push(from)?;
    revwalk.hide(excluded)?;
    revwalk.set_sorting(Sort::TIME)?;

    let mut oldest = None;
    for oid in revwalk {
        oldest = Some(oid?);
    }
    Ok(oldest)
}

/// Resolve a branch name: local branch, then `origin/<name>`, then any revision.
fn resolve_branch(repo: &Repository, branch: &str) -> Result<Oid> {
    if let Ok(local) = repo.find_branch(branch, BranchType::Local) {
        if let Some(oid) = local.get().target() {
            return Ok(oid);
        }
    }
    if let Ok(remote) = repo.find_branch(&format!("origin/{}", branch), BranchType::Remote) {
        if let Some(oid) = remote.get().target() {
            return Ok(oid);
        }
    }
    resolve_revision(repo, branch)
}

fn resolve_revision(repo: &Repository, spec: &str) -> Result<Oid> {
    Ok(repo.revparse_single(spec)?.peel_to_commit()?.id())
}

/// Commit time in the timezone it was recorded in
pub fn commit_datetime(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    DateTime::<Utc>::from_timestamp(time.seconds(), 0).map(|dt| dt.with_timezone(&offset))
}
