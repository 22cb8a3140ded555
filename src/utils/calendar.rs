use chrono::{Datelike, Duration, NaiveDate};

/// Maps calendar dates onto an `f64` chart axis counted in days from an origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayAxis {
    origin: NaiveDate,
}

impl DayAxis {
    pub fn new(origin: NaiveDate) -> Self {
        Self { origin }
    }

    pub fn x(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64
    }

    /// Date for an axis position, rounding down to whole days.
    pub fn date(&self, x: f64) -> NaiveDate {
        self.origin + Duration::days(x.floor() as i64)
    }
}

/// First day of every month intersecting `[from, to]`, starting with the month containing `from`.
pub fn month_starts(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut starts = Vec::new();
    let mut current = from.with_day(1);
    while let Some(month) = current.filter(|m| *m <= to) {
        starts.push(month);
        current = if month.month() == 12 {
            NaiveDate::from_ymd_opt(month.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(month.year(), month.month() + 1, 1)
        };
    }
    starts
}

/// January 1st of every year from the year of `from` through the year of `to`.
pub fn year_starts(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    (from.year()..=to.year())
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .collect()
}

/// Whole days making up `fraction` of the span between two dates.
pub fn padding_days(from: NaiveDate, to: NaiveDate, fraction: f64) -> i64 {
    ((to - from).num_days() as f64 * fraction) as i64
}
