//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - series line: `-`
//! - data points: `o`

use crate::domain::{ChartSpec, XValue};

/// Render a line chart.
///
/// Numeric x values are placed proportionally; label x values (months) are
/// spaced evenly in series order.
pub fn render_line_chart(chart: &ChartSpec, width: usize, height: usize) -> String {
    let points = plot_points(chart);
    let Some((x_min, x_max)) = x_range(&points) else {
        return "(no data)\n".to_string();
    };

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let mut prev = None;
    for &(x, y) in &points {
        let px = map_x(x, x_min, x_max, width);
        let py = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, px, py, '-');
        }
        prev = Some((px, py));
    }
    for &(x, y) in &points {
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {}=[{}, {}] | {}=[{y_min:.2}, {y_max:.2}]\n",
        chart.x_label,
        first_label(chart),
        last_label(chart),
        chart.y_label,
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn plot_points(chart: &ChartSpec) -> Vec<(f64, f64)> {
    chart
        .series
        .iter()
        .enumerate()
        .map(|(i, p)| match p.x {
            XValue::Number(x) => (x, p.y),
            XValue::Label(_) => (i as f64, p.y),
        })
        .collect()
}

fn first_label(chart: &ChartSpec) -> String {
    chart.series.first().map(|p| p.x.label()).unwrap_or_default()
}

fn last_label(chart: &ChartSpec) -> String {
    chart.series.last().map(|p| p.x.label()).unwrap_or_default()
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        // A single point still plots; widen around it.
        Some((min_x - 0.5, max_x + 0.5))
    }
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 1.0, min_y + 1.0))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartKind, SeriesPoint};

    #[test]
    fn plot_golden_snapshot_small() {
        let chart = ChartSpec::new(
            ChartKind::Line,
            "t",
            "Year",
            "Automobile_Sales",
            vec![
                SeriesPoint::new(XValue::Number(2000.0), 100.0),
                SeriesPoint::new(XValue::Number(2009.0), 110.0),
            ],
        );

        let txt = render_line_chart(&chart, 10, 5);
        let expected = concat!(
            "Plot: Year=[2000, 2009] | Automobile_Sales=[99.50, 110.50]\n",
            "        -o\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "o-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn label_axis_is_evenly_spaced_and_empty_series_is_flagged() {
        let mut chart = ChartSpec::new(ChartKind::Line, "m", "Month", "Automobile_Sales", Vec::new());
        assert_eq!(render_line_chart(&chart, 10, 5), "(no data)\n");

        chart.series = vec![
            SeriesPoint::new(XValue::Label("Jan".to_string()), 5.0),
            SeriesPoint::new(XValue::Label("Feb".to_string()), 5.0),
            SeriesPoint::new(XValue::Label("Mar".to_string()), 5.0),
        ];
        let txt = render_line_chart(&chart, 11, 5);
        assert!(txt.starts_with("Plot: Month=[Jan, Mar]"));
        // Flat series sits on the middle row with points at both ends and center.
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows[2], "o----o----o");
    }
}
