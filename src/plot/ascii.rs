//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily trend: `-` polyline, `C` changepoint marker
//! - gender trend: `-` total-volume polyline (left axis), `r` ratio points
//!   (right axis)
//! - dayparts: horizontal `#` bars

use crate::domain::{Changepoint, DailySeries, DaypartBreakdown, GenderDaily, PlotConfig};

/// Render the daily sales trend, marking the changepoint day when known.
pub fn render_daily_trend(
    series: &DailySeries,
    changepoint: Option<&Changepoint>,
    cfg: &PlotConfig,
) -> String {
    let width = cfg.width.max(10);
    let height = cfg.height.max(5);

    if series.is_empty() {
        return "Daily sales: (no data)\n".to_string();
    }

    let points: Vec<(f64, f64)> = series
        .days
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.count as f64))
        .collect();

    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = value_range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    draw_polyline(&mut grid, &points, 0.0, x_max, y_min, y_max);

    if let Some(cp) = changepoint {
        if let Some(idx) = series.days.iter().position(|d| d.day == cp.day) {
            let x = map_x(idx as f64, 0.0, x_max, width);
            let y = map_y(cp.count as f64, y_min, y_max, height);
            grid[y][x] = 'C';
        }
    }

    let first = series.days.first().map(|d| d.day).unwrap_or_default();
    let last = series.days.last().map(|d| d.day).unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!(
        "Daily sales: {first}..{last} | count=[{y_min:.0}, {y_max:.0}] | C = changepoint\n"
    ));
    push_grid(&mut out, grid);
    out
}

/// Render total gendered volume against the male/female ratio.
///
/// The two series use independent value axes; days whose ratio is undefined
/// simply contribute no `r` marker.
pub fn render_gender_trend(gender: &[GenderDaily], cfg: &PlotConfig) -> String {
    let width = cfg.width.max(10);
    let height = cfg.height.max(5);

    if gender.is_empty() {
        return "Gender trend: (no gendered records)\n".to_string();
    }

    let totals: Vec<(f64, f64)> = gender
        .iter()
        .enumerate()
        .map(|(i, g)| (i as f64, g.total() as f64))
        .collect();
    let ratios: Vec<(f64, f64)> = gender
        .iter()
        .enumerate()
        .filter_map(|(i, g)| g.ratio().map(|r| (i as f64, r)))
        .collect();

    let x_max = (gender.len().saturating_sub(1)).max(1) as f64;
    let (t_min, t_max) = value_range(totals.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (t_min, t_max) = pad_range(t_min, t_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    draw_polyline(&mut grid, &totals, 0.0, x_max, t_min, t_max);

    let ratio_header = match value_range(ratios.iter().map(|p| p.1)) {
        Some((r_min, r_max)) => {
            let (r_min, r_max) = pad_range(r_min, r_max, 0.05);
            for &(x, r) in &ratios {
                let col = map_x(x, 0.0, x_max, width);
                let row = map_y(r, r_min, r_max, height);
                grid[row][col] = 'r';
            }
            format!("ratio=[{r_min:.2}, {r_max:.2}]")
        }
        None => {
            // Fewer than two distinct ratio values; plot them mid-grid.
            for &(x, _) in &ratios {
                let col = map_x(x, 0.0, x_max, width);
                grid[height / 2][col] = 'r';
            }
            "ratio: flat/undefined".to_string()
        }
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Gender: total volume (-) total=[{t_min:.0}, {t_max:.0}] | ratio (r) {ratio_header}\n"
    ));
    push_grid(&mut out, grid);
    out
}

/// Render the daypart breakdown as horizontal bars.
pub fn render_daypart_bars(breakdown: &DaypartBreakdown, cfg: &PlotConfig) -> String {
    let width = cfg.width.max(30);
    let bar_area = width.saturating_sub(20).max(10);

    let mut out = String::new();
    out.push_str("Sales by daypart:\n");
    for share in &breakdown.shares {
        let bar_len = (share.share * bar_area as f64).round() as usize;
        out.push_str(&format!(
            "{:<10} {:<width$} {:>5.1}%\n",
            share.part.display_name(),
            "#".repeat(bar_len),
            share.share * 100.0,
            width = bar_area
        ));
    }
    if breakdown.unlabeled > 0 {
        out.push_str(&format!(
            "({} records on boundary hours received no label)\n",
            breakdown.unlabeled
        ));
    }
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v.is_finite() && max_v.is_finite() && max_v > min_v {
        Some((min_v, max_v))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
