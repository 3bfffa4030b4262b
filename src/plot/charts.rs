//! SVG chart exports via Plotters.
//!
//! The SVG backend keeps the dependency surface small (no system font
//! rasterization). Chart geometry always arrives through an explicit
//! `ChartSize`; nothing here reads ambient configuration.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{Changepoint, ChartSize, DailySeries, Daypart, DaypartBreakdown, GenderDaily};
use crate::error::AppError;

/// Daily sales trend line, with the changepoint highlighted when known.
pub fn render_daily_trend_svg(
    path: &Path,
    series: &DailySeries,
    changepoint: Option<&Changepoint>,
    size: ChartSize,
) -> Result<(), AppError> {
    if series.is_empty() {
        return Err(AppError::render("Cannot chart an empty daily series."));
    }

    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let n = series.len();
    let y_max = series.days.iter().map(|d| d.count).max().unwrap_or(1).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Daily sales", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..n, 0u64..y_max + y_max / 10 + 1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("day index")
        .y_desc("sales")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            series.days.iter().enumerate().map(|(i, d)| (i, d.count)),
            &BLUE,
        ))
        .map_err(chart_err)?;

    if let Some(cp) = changepoint {
        if let Some(idx) = series.days.iter().position(|d| d.day == cp.day) {
            chart
                .draw_series(std::iter::once(Circle::new((idx, cp.count), 4, RED.filled())))
                .map_err(chart_err)?;
        }
    }

    root.present().map_err(chart_err)
}

/// Total gendered volume (left axis) vs male/female ratio (right axis).
///
/// Days with an undefined ratio contribute no ratio point; the volume line
/// still covers them.
pub fn render_gender_trend_svg(
    path: &Path,
    gender: &[GenderDaily],
    size: ChartSize,
) -> Result<(), AppError> {
    if gender.is_empty() {
        return Err(AppError::render("Cannot chart an empty gender series."));
    }

    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let n = gender.len();
    let max_total = gender
        .iter()
        .map(|g| g.total())
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let max_ratio = gender
        .iter()
        .filter_map(|g| g.ratio())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Gender ratio and sales volume", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0..n, 0f64..max_total * 1.1)
        .map_err(chart_err)?
        .set_secondary_coord(0..n, 0f64..max_ratio * 1.1);

    chart
        .configure_mesh()
        .x_desc("day index")
        .y_desc("total sales (male + female)")
        .draw()
        .map_err(chart_err)?;
    chart
        .configure_secondary_axes()
        .y_desc("male/female ratio")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            gender.iter().enumerate().map(|(i, g)| (i, g.total() as f64)),
            &BLUE,
        ))
        .map_err(chart_err)?;

    chart
        .draw_secondary_series(LineSeries::new(
            gender
                .iter()
                .enumerate()
                .filter_map(|(i, g)| g.ratio().map(|r| (i, r))),
            &RED,
        ))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Daypart shares as a bar chart over the four fixed buckets.
pub fn render_daypart_shares_svg(
    path: &Path,
    breakdown: &DaypartBreakdown,
    size: ChartSize,
) -> Result<(), AppError> {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Share of sales by daypart", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..4f64, 0f64..1f64)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(4)
        .x_label_formatter(&|x: &f64| {
            let idx = x.floor() as usize;
            Daypart::ALL
                .get(idx)
                .map(|p| p.display_name().to_string())
                .unwrap_or_default()
        })
        .y_desc("share of labeled sales")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(breakdown.shares.iter().enumerate().map(|(i, s)| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, s.share)],
                BLUE.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("Chart render failed: {e}"))
}
