mod chart;
pub mod styles;


pub use chart::{plot_branch_ages, plot_contributor_activity, plot_contributor_count, plot_open_issues};
pub use styles::{ChartStyle, ChartTheme};
