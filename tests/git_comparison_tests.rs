use chrono::NaiveDate;
use git2::{Repository, Signature, Time};
use gitreports::analysis::{collect_contributor_activity, HistoryFilter, Mailmap};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const DAY: i64 = 86_400;
/// 2024-01-01T12:00:00Z
const BASE: i64 = 1_704_110_400;

fn run_git_command(repo_path: &Path, args: &[&str]) -> Option<String> {
    Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).to_string())
}

/// Distinct committer-local dates per author name, as reported by `git log`.
fn get_git_author_dates(repo_path: &Path) -> Option<BTreeMap<String, BTreeSet<NaiveDate>>> {
    let output = run_git_command(repo_path, &["log", "--format=%an|%cd", "--date=short", "HEAD"])?;
    let mut dates: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for line in output.lines() {
        let (name, date) = line.split_once('|')?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        dates.entry(name.to_string()).or_default().insert(date);
    }
    Some(dates)
}

/// Commits spread across timezones so that local and UTC dates disagree.
fn setup_timezone_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    let commits = [
        ("Ana", "ana@example.com", 0, 0, 0),
        ("Ana", "ana@example.com", 0, 11 * 3600 + 30 * 60, 120),
        ("Kenji", "kenji@example.com", 3, 10 * 3600, 540),
        ("Marta", "marta@example.com", 3, -11 * 3600, -300),
        ("Ana", "ana@example.com", 45, 0, 60),
    ];

    let mut parent = None;
    for (name, email, day, shift, offset_minutes) in commits {
        let time = Time::new(BASE + day * DAY + shift, offset_minutes);
        let signature = Signature::new(name, email, &time).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parent.iter().map(|oid| repo.find_commit(*oid).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        parent = Some(
            repo.commit(Some("HEAD"), &signature, &signature, "change", &tree, &parent_refs)
                .unwrap(),
        );
    }

    (temp_dir, repo)
}

#[test]
fn test_commit_dates_match_git_log() {
    let (temp_dir, _repo) = setup_timezone_repo();

    let Some(git_dates) = get_git_author_dates(temp_dir.path()) else {
        eprintln!("git executable not available, skipping comparison");
        return;
    };

    let filter = HistoryFilter {
        branch: "HEAD".to_string(),
        since: None,
        exclusions: Vec::new(),
    };
    let activity = collect_contributor_activity(temp_dir.path(), &filter, &Mailmap::default()).unwrap();
    let ours: BTreeMap<String, BTreeSet<NaiveDate>> = activity
        .iter()
        .map(|(name, dates)| (name.clone(), dates.clone()))
        .collect();

    assert_eq!(
        git_dates, ours,
        "Commit dates don't match! Git: {:?}, Ours: {:?}",
        git_dates, ours
    );
}
