mod calendar;

pub use calendar::{month_starts, padding_days, year_starts, DayAxis};
