/// Benchmark module for the contributor analysis.
/// Measures history collection, period grouping and count aggregation.
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use git2::{Repository, Signature, Time};
use gitreports::analysis::{
    aggregate_counts_by_date, collect_contributor_activity_async, ActivityPeriodAggregator,
    HistoryFilter, Mailmap,
};
use gitreports::types::ContributorActivity;
use tempfile::TempDir;
use tokio::runtime::Runtime;

const DAY: i64 = 86_400;
/// 2024-01-01T12:00:00Z
const BASE: i64 = 1_704_110_400;

/// Set up a repository with a few hundred commits from rotating authors
fn setup_large_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();

    let mut parent = None;
    for i in 0..500i64 {
        let name = format!("Author {}", i % 7);
        let email = format!("author{}@example.com", i % 7);
        let signature = Signature::new(&name, &email, &Time::new(BASE + i * DAY / 2, 0)).unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parent.iter().map(|oid| repo.find_commit(*oid).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        parent = Some(
            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                &format!("Commit {}", i),
                &tree,
                &parent_refs,
            )
            .unwrap(),
        );
    }

    (temp_dir, repo)
}

/// Synthetic activity: contributors active in bursts separated by long pauses
fn synthetic_activity(contributors: usize, days: i64) -> ContributorActivity {
    let origin = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let mut activity = ContributorActivity::new();
    for c in 0..contributors {
        let stride = 1 + (c as i64 % 5);
        let mut day = c as i64;
        while day < days {
            activity.record(format!("contributor-{}", c), origin + Duration::days(day));
            // Every few bursts, pause long enough to start a new period
            day += if (day / stride) % 40 == 39 { 120 } else { stride };
        }
    }
    activity
}

fn bench_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_collection");
    let rt = Runtime::new().unwrap();
    let (temp_dir, _repo) = setup_large_test_repo();

    group.bench_function("collect_contributor_activity", |b| {
        b.iter(|| {
            rt.block_on(async {
                collect_contributor_activity_async(
                    temp_dir.path().to_path_buf(),
                    HistoryFilter {
                        branch: "HEAD".to_string(),
                        since: None,
                        exclusions: vec!["dependabot".to_string()],
                    },
                    Mailmap::default(),
                )
                .await
                .unwrap()
            })
        });
    });

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("activity_aggregation");
    let activity = synthetic_activity(200, 3650);
    let aggregator = ActivityPeriodAggregator::new(Duration::days(90), 15);

    group.bench_function("group_into_periods", |b| {
        b.iter(|| aggregator.group_into_periods(black_box(&activity)))
    });

    let periods = aggregator.group_into_periods(&activity);
    group.bench_function("aggregate_counts_by_date", |b| {
        b.iter(|| aggregate_counts_by_date(black_box(&periods)))
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_collection, bench_aggregation
);
criterion_main!(benches);
