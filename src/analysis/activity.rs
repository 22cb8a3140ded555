use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::types::{ActivityPeriod, ContributorActivity, ContributorCountSample, PeriodsByContributor};

/// Groups commit dates into continuous activity periods.
///
/// Two consecutive commit dates of the same contributor share a period when
/// the gap between them is at most `gap_threshold`. Periods shorter than
/// `min_period_days` get their `end_date` pushed out for display only.
#[derive(Clone, Copy, Debug)]
pub struct ActivityPeriodAggregator {
    pub gap_threshold: Duration,
    pub min_period_days: i64,
}

impl ActivityPeriodAggregator {
    pub fn new(gap_threshold: Duration, min_period_days: i64) -> Self {
        Self {
            gap_threshold,
            min_period_days,
        }
    }

    /// Build the activity periods of every contributor.
    pub fn group_into_periods(&self, activity: &ContributorActivity) -> PeriodsByContributor {
        activity
            .iter()
            .map(|(contributor, dates)| (contributor.clone(), self.periods_for(dates)))
            .collect()
    }

    /// Periods for one contributor. `dates` must be non-empty.
    fn periods_for(&self, dates: &BTreeSet<NaiveDate>) -> Vec<ActivityPeriod> {
        let mut periods = Vec::new();
        // BTreeSet iterates in ascending order
        let mut sorted = dates.iter().copied();
        let Some(first) = sorted.next() else {
            return periods;
        };

        let mut start = first;
        let mut last = first;
        for date in sorted {
            if date - last > self.gap_threshold {
                periods.push(self.close_period(start, last));
                start = date;
            }
            last = date;
        }
        periods.push(self.close_period(start, last));

        periods
    }

    fn close_period(&self, start: NaiveDate, last: NaiveDate) -> ActivityPeriod {
        let actual_span_days = (last - start).num_days() + 1;
        let display_days = actual_span_days.max(self.min_period_days);
        ActivityPeriod {
            start_date: start,
            end_date: start + Duration::days(display_days),
            actual_span_days,
        }
    }
}

/// Drop contributors whose summed actual activity is below `min_days`.
pub fn retain_min_contribution(periods: &mut PeriodsByContributor, min_days: i64) {
    periods.retain(|_, list| list.iter().map(|p| p.actual_span_days).sum::<i64>() >= min_days);
}

/// Count active contributors at every period boundary.
///
/// A period covers every date in `[start_date, end_date]`. A date that is the
/// end boundary of at least one period loses exactly one count, so the
/// contributor stops counting from the end date onward.
pub fn aggregate_counts_by_date(periods: &PeriodsByContributor) -> Vec<ContributorCountSample> {
    let mut boundaries = BTreeSet::new();
    let mut end_dates = BTreeSet::new();
    for period in periods.values().flatten() {
        boundaries.insert(period.start_date);
        boundaries.insert(period.end_date);
        end_dates.insert(period.end_date);
    }

    boundaries
        .into_iter()
        .map(|date| {
            let covering = periods
                .values()
                .flatten()
                .filter(|p| p.start_date <= date && date <= p.end_date)
                .count();
            let count = if end_dates.contains(&date) {
                covering.saturating_sub(1)
            } else {
                covering
            };
            ContributorCountSample { date, count }
        })
        .collect()
}
