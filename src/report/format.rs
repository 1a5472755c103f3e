//! Formatted terminal output for a computed view.
//!
//! We keep formatting code in one place so:
//! - the aggregation/controller code stays free of presentation concerns
//! - output changes are localized (important for snapshot tests)

use crate::controller::DashboardView;
use crate::domain::{ChartKind, ChartSpec, Dataset};

/// Width of the longest bar in bar/pie tables.
const BAR_WIDTH: usize = 30;

/// Dataset summary header.
pub fn format_dataset_summary(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str("=== Automobile Sales Statistics Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", dataset.source));
    out.push_str(&format!(
        "Rows: used={} | read={} | skipped={} | years={}-{} | recession rows={}\n",
        dataset.stats.rows_used,
        dataset.stats.rows_read,
        dataset.row_errors.len(),
        dataset.stats.year_min,
        dataset.stats.year_max,
        dataset.stats.recession_rows,
    ));
    out
}

/// Format the whole view: selection line, optional notice, then each chart.
pub fn format_view(view: &DashboardView, plot_width: usize, plot_height: usize) -> String {
    let mut out = String::new();

    let year = view
        .selection
        .selected_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "Report: {} | year: {year}{} | state: {}\n",
        view.selection.report_mode.display_name(),
        if view.year_input_disabled { " (disabled)" } else { "" },
        view.state.display_name(),
    ));

    if let Some(notice) = &view.notice {
        out.push_str(&format!("Notice: {}\n", notice.message()));
    }

    if view.layout.is_empty() {
        out.push_str("(no charts)\n");
        return out;
    }

    for (idx, chart) in view.layout.charts().enumerate() {
        out.push('\n');
        out.push_str(&format!("[{}] {} ({:?})\n", idx + 1, chart.title, chart.kind));
        out.push_str(&format_chart(chart, plot_width, plot_height));
    }

    out
}

/// Format one chart as text.
pub fn format_chart(chart: &ChartSpec, plot_width: usize, plot_height: usize) -> String {
    if chart.series.is_empty() {
        return "(no data)\n".to_string();
    }
    match chart.kind {
        ChartKind::Line => crate::plot::render_line_chart(chart, plot_width, plot_height),
        ChartKind::Bar if chart.color_field.is_some() => format_grouped_table(chart),
        ChartKind::Bar => format_bar_table(chart),
        ChartKind::Pie => format_share_table(chart),
    }
}

fn format_bar_table(chart: &ChartSpec) -> String {
    let max = chart.series.iter().map(|p| p.y).fold(0.0, f64::max);
    let mut out = String::new();
    out.push_str(&format!("{:<18} {:>12}\n", truncate(&chart.x_label, 18), truncate(&chart.y_label, 12)));
    for p in &chart.series {
        out.push_str(
            format!(
                "{:<18} {:>12.2} {}\n",
                truncate(&p.x.label(), 18),
                p.y,
                bar(p.y, max)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn format_share_table(chart: &ChartSpec) -> String {
    let total: f64 = chart.series.iter().map(|p| p.y).sum();
    let mut out = String::new();
    out.push_str(&format!("{:<18} {:>12} {:>7}\n", truncate(&chart.x_label, 18), "total", "share"));
    for p in &chart.series {
        let share = if total > 0.0 { p.y / total } else { 0.0 };
        out.push_str(
            format!(
                "{:<18} {:>12.2} {:>6.1}% {}\n",
                truncate(&p.x.label(), 18),
                p.y,
                share * 100.0,
                bar(share, 1.0)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// One row per x value, one column per group.
fn format_grouped_table(chart: &ChartSpec) -> String {
    let groups = chart.groups();
    let mut out = String::new();

    let mut header = format!("{:<10}", truncate(&chart.x_label, 10));
    for g in &groups {
        header.push_str(&format!(" {:>16}", truncate(g, 16)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut xs: Vec<String> = Vec::new();
    for p in &chart.series {
        let label = p.x.label();
        if !xs.contains(&label) {
            xs.push(label);
        }
    }

    for x in &xs {
        let mut line = format!("{x:<10}");
        for g in &groups {
            let cell = chart
                .series
                .iter()
                .find(|p| p.x.label() == *x && p.group.as_deref() == Some(*g))
                .map(|p| format!("{:.2}", p.y))
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>16}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if !(max > 0.0) || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let n = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(n.min(BAR_WIDTH))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
