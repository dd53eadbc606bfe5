//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Chart kinds:
//! - horizontal bars for keyed metrics (spend per customer, quantity per item)
//! - a line chart for the monthly sales trend: points `o`, segments `-`

use crate::domain::MonthlySales;

/// Render labelled values as horizontal bars.
///
/// Bars grow from a zero axis `|`; negative values grow to its left.
pub fn render_bar_chart(title: &str, rows: &[(String, f64)], width: usize) -> String {
    let mut out = format!("{title}\n");
    if rows.is_empty() {
        out.push_str("  (nothing to show)\n");
        return out;
    }

    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0).min(14);
    let bar_width = width.max(10);

    let min = rows.iter().map(|&(_, v)| v).fold(0.0_f64, f64::min);
    let max = rows.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);
    let span = (max - min).max(1e-12);

    // Columns reserved left of the axis for negative bars.
    let neg_cols = ((-min / span) * bar_width as f64).round() as usize;
    let pos_cols = bar_width.saturating_sub(neg_cols);

    for (label, value) in rows {
        let label = crate::report::truncate(label, label_width);
        let (left, right) = if *value < 0.0 {
            let n = ((-value / span) * bar_width as f64).round() as usize;
            let n = n.min(neg_cols);
            (format!("{}{}", " ".repeat(neg_cols - n), "#".repeat(n)), String::new())
        } else {
            let n = ((value / span) * bar_width as f64).round() as usize;
            (" ".repeat(neg_cols), "#".repeat(n.min(pos_cols)))
        };
        out.push_str(&format!("{label:<label_width$} {left}|{right} {value:.2}\n"));
    }

    out
}

/// Render the monthly sales series as a line chart.
pub fn render_trend_chart(trend: &[MonthlySales], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
        return "Monthly sales: (nothing to show)\n".to_string();
    };

    let (y_min, y_max) = y_range(trend).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let x_min = first.month.index() as f64;
    let x_max = (last.month.index() as f64).max(x_min + 1.0);

    let mut grid = vec![vec![' '; width]; height];

    let mut prev = None;
    for row in trend {
        let x = map_x(row.month.index() as f64, x_min, x_max, width);
        let y = map_y(row.sales, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }
    // Points last so they overlay the segments.
    for row in trend {
        let x = map_x(row.month.index() as f64, x_min, x_max, width);
        let y = map_y(row.sales, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Monthly sales: months=[{}, {}] | sales=[{y_min:.2}, {y_max:.2}]\n",
        first.month, last.month
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn y_range(trend: &[MonthlySales]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for r in trend {
        min_y = min_y.min(r.sales);
        max_y = max_y.max(r.sales);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
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
