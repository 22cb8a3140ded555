use chrono::NaiveDate;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use tracing::info;

use super::styles::{ChartStyle, ChartTheme};
use crate::error::{PlotError, ReportError, Result};
use crate::types::{
    ActivityPeriod, BranchAge, ContributorCountSample, OpenIssueSample, PeriodsByContributor,
    ReleasePeriod,
};
use crate::utils::{month_starts, padding_days, year_starts, DayAxis};

type DateChart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Fraction of the date span added on both sides of the x axis
const X_PADDING: f64 = 0.01;
/// Fraction of the largest count added above and below the y axis
const Y_PADDING: f64 = 0.01;

/// Horizontal bars from each release branch's fork date to its latest commit.
pub fn plot_branch_ages(
    ages: &[BranchAge],
    path: &Path,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<()> {
    if ages.is_empty() {
        return Err(ReportError::NoData("no valid branch data found".to_string()));
    }

    let height = (ages.len() as u32 * 100).max(500);
    render("Branch age plot", path, (1200, height), theme, |root| {
        draw_branch_ages(root, ages, theme, style)
    })
}

/// One row per contributor with a bar for every activity period.
pub fn plot_contributor_activity(
    periods: &PeriodsByContributor,
    path: &Path,
    less_than_year: bool,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<()> {
    if periods.values().all(Vec::is_empty) {
        return Err(ReportError::NoData("no contributor activity to plot".to_string()));
    }

    let height = (periods.len() as u32 * 25 + 200).max(800);
    render("Activity plot", path, (1500, height), theme, |root| {
        draw_contributor_activity(root, periods, less_than_year, theme, style)
    })
}

/// Step bars of the active contributor count between consecutive boundary dates.
pub fn plot_contributor_count(
    samples: &[ContributorCountSample],
    path: &Path,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<()> {
    if samples.is_empty() {
        return Err(ReportError::NoData("no contributor counts to plot".to_string()));
    }

    render("Contributor count plot", path, (2000, 600), theme, |root| {
        draw_contributor_count(root, samples, theme, style)
    })
}

/// Open issue count per day drawn over shaded release periods.
pub fn plot_open_issues(
    series: &[OpenIssueSample],
    releases: &[ReleasePeriod],
    path: &Path,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<()> {
    if series.is_empty() {
        return Err(ReportError::NoData("no issues to plot".to_string()));
    }

    render("Open issues plot", path, (2000, 600), theme, |root| {
        draw_open_issues(root, series, releases, theme, style)
    })
}

/// Create the output file's directory, draw, and save the PNG.
fn render<F>(
    label: &str,
    path: &Path,
    size: (u32, u32),
    theme: &ChartTheme,
    draw: F,
) -> Result<()>
where
    F: FnOnce(&Root) -> std::result::Result<(), PlotError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&theme.background_color).map_err(wrap_err)?;
    draw(&root)?;
    root.present().map_err(wrap_err)?;

    let saved: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    info!("{} saved to: {}", label, saved.display());
    Ok(())
}

// Helper function to wrap errors
fn wrap_err<E>(e: E) -> PlotError
where
    E: Into<PlotError>,
{
    e.into()
}

fn text_style<'a>(theme: &ChartTheme, size: u32) -> TextStyle<'a> {
    ("sans-serif", size).into_font().color(&theme.text_color)
}

fn draw_branch_ages(
    root: &Root,
    ages: &[BranchAge],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let spans: Vec<(NaiveDate, NaiveDate)> = ages
        .iter()
        .map(|age| (age.fork_date.date_naive(), age.latest_commit_date.date_naive()))
        .collect();
    let first = spans.iter().map(|(start, _)| *start).min().unwrap_or_default();
    let last = spans.iter().map(|(_, end)| *end).max().unwrap_or(first);
    // Room for the date labels on either side of the bars
    let pad = padding_days(first, last, 0.05).max(2);

    let axis = DayAxis::new(first);
    let rows = ages.len() as f64;
    let names: Vec<String> = ages.iter().map(|age| age.name.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption("Branch Ages", text_style(theme, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size * 4)
        .build_cartesian_2d(-(pad as f64)..axis.x(last) + pad as f64, -0.5..rows - 0.5)?;

    let x_fmt = |x: &f64| axis.date(*x).format("%Y-%m").to_string();
    let y_fmt = |y: &f64| row_label(&names, *y);
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc("Branches")
        .label_style(text_style(theme, style.font_size))
        .y_labels(ages.len() * 2 + 1)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    draw_vertical_lines(&mut chart, &month_starts(first, last), &axis, (-0.5, rows - 0.5), theme.grid_color, 1)?;

    chart.draw_series(spans.iter().enumerate().map(|(i, (start, end))| {
        let y = i as f64;
        Rectangle::new(
            [(axis.x(*start), y - 0.4), (axis.x(*end), y + 0.4)],
            theme.bar_color.filled(),
        )
    }))?;
    chart.draw_series(spans.iter().enumerate().map(|(i, (start, end))| {
        let y = i as f64;
        Rectangle::new(
            [(axis.x(*start), y - 0.4), (axis.x(*end), y + 0.4)],
            theme.edge_color.stroke_width(1),
        )
    }))?;

    let centered = text_style(theme, style.font_size).pos(Pos::new(HPos::Center, VPos::Center));
    let before = text_style(theme, style.font_size - 4).pos(Pos::new(HPos::Right, VPos::Center));
    let after = text_style(theme, style.font_size - 4).pos(Pos::new(HPos::Left, VPos::Center));
    for (i, (age, (start, end))) in ages.iter().zip(&spans).enumerate() {
        let y = i as f64;
        let (x0, x1) = (axis.x(*start), axis.x(*end));
        chart.draw_series(std::iter::once(Text::new(
            format!("{} days", age.age_days),
            ((x0 + x1) / 2.0, y),
            centered.clone(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            start.format("%Y-%m-%d").to_string(),
            (x0 - 1.0, y),
            before.clone(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            end.format("%Y-%m-%d").to_string(),
            (x1 + 1.0, y),
            after.clone(),
        )))?;
    }

    Ok(())
}

fn draw_contributor_activity(
    root: &Root,
    periods: &PeriodsByContributor,
    less_than_year: bool,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let rows = ordered_rows(periods);
    let all = || rows.iter().flat_map(|(_, list)| list.iter());
    let first = all().map(|p| p.start_date).min().unwrap_or_default();
    let last = all().map(|p| p.end_date).max().unwrap_or(first);
    let pad = padding_days(first, last, X_PADDING) as f64;

    let axis = DayAxis::new(first);
    let count = rows.len();
    let names: Vec<String> = rows.iter().map(|(name, _)| name.to_string()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(
            "Continuous Contribution Periods of Contributors",
            text_style(theme, style.caption_size),
        )
        .margin(style.margin)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size * 4)
        .build_cartesian_2d(-pad..axis.x(last) + pad, -1.0..count as f64)?;

    let (date_format, tick_count) = if less_than_year {
        ("%Y-%m", month_starts(first, last).len())
    } else {
        ("%Y", year_starts(first, last).len())
    };
    let x_fmt = |x: &f64| axis.date(*x).format(date_format).to_string();
    let y_fmt = |y: &f64| row_label(&names, *y);
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc("Contributors")
        .label_style(text_style(theme, style.font_size))
        .x_labels(tick_count.max(2))
        .y_labels(count + 2)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    let x_min = -pad;
    let x_max = axis.x(last) + pad;
    for i in 0..count {
        let width = if i % 10 == 0 { 2 } else { 1 };
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_min, i as f64), (x_max, i as f64)],
            theme.grid_color.stroke_width(width),
        )))?;
    }

    let years: Vec<NaiveDate> = year_starts(first, last)
        .into_iter()
        .filter(|year| *year >= first)
        .collect();
    draw_vertical_lines(&mut chart, &years, &axis, (-1.0, count as f64), theme.axis_color.mix(0.5), 1)?;

    for (i, (_, list)) in rows.iter().enumerate() {
        let color = HSLColor(i as f64 / count.max(1) as f64, 0.85, 0.5);
        let y = i as f64;
        chart.draw_series(list.iter().map(|period| {
            Rectangle::new(
                [(axis.x(period.start_date), y - 0.2), (axis.x(period.end_date), y + 0.2)],
                color.filled(),
            )
        }))?;
        chart.draw_series(list.iter().map(|period| {
            Rectangle::new(
                [(axis.x(period.start_date), y - 0.2), (axis.x(period.end_date), y + 0.2)],
                theme.edge_color.stroke_width(1),
            )
        }))?;
    }

    Ok(())
}

fn draw_contributor_count(
    root: &Root,
    samples: &[ContributorCountSample],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let first = samples[0].date;
    let last = samples[samples.len() - 1].date;
    let pad = padding_days(first, last, X_PADDING).max(1) as f64;
    let max_count = samples.iter().map(|s| s.count).max().unwrap_or(0).max(1) as f64;
    let y_pad = max_count * Y_PADDING;

    let axis = DayAxis::new(first);
    let mut chart = ChartBuilder::on(root)
        .caption("Number of Contributors Over Time", text_style(theme, style.caption_size))
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(-pad..axis.x(last) + pad, -y_pad..max_count + y_pad)?;

    let x_fmt = |x: &f64| axis.date(*x).format("%Y").to_string();
    let y_fmt = |y: &f64| integer_label(*y);
    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc("Number of Contributors")
        .label_style(text_style(theme, style.font_size))
        .x_labels(year_starts(first, last).len().max(2))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    let mut distinct: Vec<usize> = samples.iter().map(|s| s.count).collect();
    distinct.sort_unstable();
    distinct.dedup();
    let color_for = |count: usize| Palette99::pick(distinct.binary_search(&count).unwrap_or(0));

    chart.draw_series(samples.windows(2).map(|pair| {
        let (current, next) = (pair[0], pair[1]);
        Rectangle::new(
            [(axis.x(current.date), 0.0), (axis.x(next.date), current.count as f64)],
            color_for(current.count).filled(),
        )
    }))?;
    chart.draw_series(samples.windows(2).map(|pair| {
        let (current, next) = (pair[0], pair[1]);
        Rectangle::new(
            [(axis.x(current.date), 0.0), (axis.x(next.date), current.count as f64)],
            theme.edge_color.stroke_width(1),
        )
    }))?;

    Ok(())
}

fn draw_open_issues(
    root: &Root,
    series: &[OpenIssueSample],
    releases: &[ReleasePeriod],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let first = releases
        .iter()
        .map(|r| r.start_date)
        .chain(std::iter::once(series[0].date))
        .min()
        .unwrap_or(series[0].date);
    let last = releases
        .iter()
        .map(|r| r.end_date)
        .chain(std::iter::once(series[series.len() - 1].date))
        .max()
        .unwrap_or(first);
    let pad = padding_days(first, last, X_PADDING).max(1) as f64;
    let y_max = series.iter().map(|s| s.open).max().unwrap_or(0).max(1) as f64 * 1.1;

    let axis = DayAxis::new(first);
    let mut chart = ChartBuilder::on(root)
        .caption("Open Issues and Releases", text_style(theme, style.caption_size))
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(-pad..axis.x(last) + pad, 0.0..y_max)?;

    let x_fmt = |x: &f64| axis.date(*x).format("%Y-%m").to_string();
    let y_fmt = |y: &f64| integer_label(*y);
    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc("Open issues")
        .label_style(text_style(theme, style.font_size))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    chart.draw_series(releases.iter().enumerate().map(|(i, release)| {
        Rectangle::new(
            [(axis.x(release.start_date), 0.0), (axis.x(release.end_date), y_max)],
            Palette99::pick(i % 2).mix(0.15).filled(),
        )
    }))?;

    let tag_style = text_style(theme, style.font_size - 4).pos(Pos::new(HPos::Left, VPos::Top));
    chart.draw_series(releases.iter().map(|release| {
        Text::new(
            release.tag_name.clone(),
            (axis.x(release.start_date) + 1.0, y_max * 0.98),
            tag_style.clone(),
        )
    }))?;

    let line_color = RGBColor(135, 206, 250);
    chart
        .draw_series(LineSeries::new(
            series.iter().map(|s| (axis.x(s.date), s.open as f64)),
            line_color.stroke_width(style.line_width),
        ))?
        .label("Open issues")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .configure_series_labels()
        .background_style(theme.background_color)
        .border_style(theme.axis_color)
        .label_font(text_style(theme, style.font_size))
        .draw()?;

    Ok(())
}

/// Vertical lines at each date spanning `y_range`.
fn draw_vertical_lines(
    chart: &mut DateChart<'_, '_>,
    dates: &[NaiveDate],
    axis: &DayAxis,
    y_range: (f64, f64),
    color: RGBAColor,
    width: u32,
) -> std::result::Result<(), PlotError> {
    chart.draw_series(dates.iter().map(|date| {
        let x = axis.x(*date);
        PathElement::new(vec![(x, y_range.0), (x, y_range.1)], color.stroke_width(width))
    }))?;
    Ok(())
}

/// Contributors ordered by their first activity, then by name.
fn ordered_rows(periods: &PeriodsByContributor) -> Vec<(&str, &[ActivityPeriod])> {
    let mut rows: Vec<(&str, &[ActivityPeriod])> = periods
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(name, list)| (name.as_str(), list.as_slice()))
        .collect();
    rows.sort_by_key(|(name, list)| (list[0].start_date, *name));
    rows
}

/// Name for an integral row position, empty between rows.
pub(crate) fn row_label(names: &[String], y: f64) -> String {
    let row = y.round();
    if (y - row).abs() > 1e-6 || row < 0.0 {
        return String::new();
    }
    names.get(row as usize).cloned().unwrap_or_default()
}

/// Whole-number tick label; fractional ticks stay blank.
pub(crate) fn integer_label(y: f64) -> String {
    if (y - y.round()).abs() > 1e-9 {
        String::new()
    } else {
        format!("{:.0}", y)
    }
}
