//! Ratatui-based terminal dashboard.
//!
//! Two selectors (report type, year) drive the reactive controller; the
//! resulting layout is drawn as a 2x2 chart grid. The dataset loads on a
//! background thread while the UI already responds to input.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::controller::{Controller, DatasetStatus, SelectionEvent};
use crate::data::DatasetSource;
use crate::domain::{ChartKind, ChartSpec, Dataset, YEAR_MAX, YEAR_MIN};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{PlotLine, SeriesPlottersChart};

const HEADING: &str = "Automobile Sales Statistics Dashboard";

/// Series palette, high-contrast for terminals.
const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (200, 120, 255),
    (255, 255, 255),
];

/// Start the TUI.
pub fn run(source: DatasetSource, timeout: Duration) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, timeout);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    controller: Controller,
    source_label: String,
    loader: Option<Receiver<Result<Dataset, AppError>>>,
    selected_field: usize,
    year_input: Option<String>,
    status: String,
}

impl App {
    fn new(source: DatasetSource, timeout: Duration) -> Self {
        let source_label = source.describe();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone if the user quit before the load finished.
            let _ = tx.send(source.load(timeout));
        });

        Self {
            controller: Controller::new(DatasetStatus::Loading),
            source_label,
            loader: Some(rx),
            selected_field: 0,
            year_input: None,
            status: "Loading dataset...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_loader() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Hand a finished background load to the controller. Returns true on change.
    fn poll_loader(&mut self) -> bool {
        let Some(rx) = &self.loader else {
            return false;
        };
        let status = match rx.try_recv() {
            Ok(Ok(dataset)) => {
                let dataset = Arc::new(dataset);
                self.status = format!(
                    "Loaded {} rows ({}-{}).",
                    dataset.stats.rows_used, dataset.stats.year_min, dataset.stats.year_max
                );
                DatasetStatus::Ready(dataset)
            }
            Ok(Err(err)) => {
                self.status = format!("Dataset unavailable: {err}");
                DatasetStatus::Unavailable(err.message().to_string())
            }
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                self.status = "Dataset loader stopped unexpectedly.".to_string();
                DatasetStatus::Unavailable("loader stopped".to_string())
            }
        };
        self.loader = None;
        self.controller.replace_dataset(status);
        true
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.year_input.is_some() {
            self.handle_year_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = 0,
            KeyCode::Down => self.selected_field = 1,
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageUp => self.adjust_field(10),
            KeyCode::PageDown => self.adjust_field(-10),
            KeyCode::Backspace | KeyCode::Delete if self.selected_field == 1 => {
                self.apply(SelectionEvent::YearChanged(None));
            }
            KeyCode::Enter | KeyCode::Char('0'..='9') if self.selected_field == 1 => {
                if self.controller.view().year_input_disabled {
                    self.status = "Year input is disabled outside Yearly Statistics.".to_string();
                } else {
                    let mut buf = String::new();
                    if let KeyCode::Char(c) = code {
                        buf.push(c);
                    }
                    self.year_input = Some(buf);
                    self.status = "Type a year, Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('e') => self.export_layout(),
            _ => {}
        }
        false
    }

    fn handle_year_edit(&mut self, code: KeyCode) {
        let Some(buf) = self.year_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.year_input = None;
                self.status = "Year edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let typed = buf.trim().to_string();
                self.year_input = None;
                if typed.is_empty() {
                    self.apply(SelectionEvent::YearChanged(None));
                } else {
                    match typed.parse::<i32>() {
                        Ok(year) => self.apply(SelectionEvent::YearChanged(Some(year))),
                        Err(e) => self.status = format!("Invalid year '{typed}': {e}"),
                    }
                }
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && buf.len() < 4 => buf.push(c),
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let selection = self.controller.selection();
        match self.selected_field {
            0 => {
                let mode = if delta >= 0 {
                    selection.report_mode.next()
                } else {
                    selection.report_mode.prev()
                };
                self.apply(SelectionEvent::ReportModeChanged(mode));
            }
            _ => {
                if selection.year_input_disabled() {
                    self.status = "Year input is disabled outside Yearly Statistics.".to_string();
                    return;
                }
                self.apply(SelectionEvent::YearChanged(Some(step_year(selection.selected_year, delta))));
            }
        }
    }

    fn apply(&mut self, event: SelectionEvent) {
        let view = self.controller.handle(event);
        self.status = match &view.notice {
            Some(notice) => notice.message(),
            None => format!("view: {}", view.state.display_name()),
        };
    }

    fn export_layout(&mut self) {
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = PathBuf::from(format!("autosales_layout_{ts}.json"));
        self.status = match crate::io::write_layout_json(&path, self.controller.view(), &self.source_label) {
            Ok(()) => format!("Wrote layout: {}", path.display()),
            Err(err) => format!("Layout export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_selectors(frame, chunks[1]);
        self.draw_charts(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = match self.controller.dataset_status() {
            DatasetStatus::Ready(d) => {
                format!("{} rows, {}-{}", d.stats.rows_used, d.stats.year_min, d.stats.year_max)
            }
            DatasetStatus::Loading => "loading".to_string(),
            DatasetStatus::Unavailable(_) => "unavailable".to_string(),
        };
        let lines = vec![
            Line::from(Span::styled(
                HEADING,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("data: {} ({rows})", self.source_label),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.controller.view();
        let year_label = match (&self.year_input, view.selection.selected_year) {
            (Some(buf), _) => format!("{buf}_"),
            (None, Some(year)) => year.to_string(),
            (None, None) => "Select-year".to_string(),
        };

        let year_style = if view.year_input_disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let year_text = if view.year_input_disabled {
            format!("Year: {year_label} (disabled)")
        } else {
            format!("Year: {year_label}")
        };

        let items = vec![
            ListItem::new(format!("Report: {}", view.selection.report_mode.display_name())),
            ListItem::new(year_text).style(year_style),
        ];

        let list = List::new(items)
            .block(Block::default().title("Selection").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.controller.view();
        if view.layout.is_empty() {
            let msg = view
                .notice
                .as_ref()
                .map(|n| n.message())
                .unwrap_or_else(|| empty_hint(view.selection.report_mode).to_string());
            let p = Paragraph::new(msg)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (row_area, row) in rows.iter().zip(view.layout.rows()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row_area);
            for (cell, chart) in cells.iter().zip(row.iter()) {
                draw_chart(frame, *cell, chart);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ±10y  digits/Enter type year  Del clear  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn empty_hint(mode: crate::domain::ReportMode) -> &'static str {
    match mode {
        crate::domain::ReportMode::Yearly => "Select a year to show the yearly report.",
        _ => "Select a report type.",
    }
}

/// Next year for an arrow/page key; an unset year starts at the range edge.
fn step_year(current: Option<i32>, delta: i32) -> i32 {
    match current {
        None if delta >= 0 => YEAR_MIN,
        None => YEAR_MAX,
        Some(year) => (year + delta).clamp(YEAR_MIN, YEAR_MAX),
    }
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let block = Block::default().title(chart.title.as_str()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if chart.series.is_empty() {
        frame.render_widget(
            Paragraph::new("No rows for this selection.").style(Style::default().fg(Color::Yellow)),
            inner,
        );
        return;
    }

    match chart.kind {
        ChartKind::Line => draw_line_chart(frame, inner, chart),
        ChartKind::Bar if chart.color_field.is_some() => draw_grouped_bar_chart(frame, inner, chart),
        ChartKind::Bar => draw_bar_chart(frame, inner, chart),
        ChartKind::Pie => draw_share_chart(frame, inner, chart),
    }
}

fn draw_line_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let lines = [plot_line(chart)];
    let (x_bounds, y_bounds) = plot_bounds(&lines);
    let labels: Vec<String> = chart.series.iter().map(|p| p.x.label()).collect();
    let categorical = chart.series.iter().any(|p| p.x.as_number().is_none());

    let fmt_x = move |v: f64| -> String {
        if categorical {
            let idx = v.round();
            if idx >= 0.0 && (idx as usize) < labels.len() && (v - idx).abs() < 1e-6 {
                labels[idx as usize].clone()
            } else {
                String::new()
            }
        } else if v.fract().abs() < 1e-9 {
            format!("{v:.0}")
        } else {
            format!("{v:.1}")
        }
    };

    let widget = SeriesPlottersChart {
        lines: &lines,
        x_bounds,
        y_bounds,
        x_label: &chart.x_label,
        y_label: &chart.y_label,
        fmt_x: &fmt_x,
        fmt_y: fmt_axis_y,
    };
    frame.render_widget(widget, area);
}

fn draw_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let n = chart.series.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(n) / n).clamp(1, 12);

    let bars: Vec<Bar> = chart
        .series
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.y.max(0.0).round() as u64)
                .label(Line::from(p.x.label()))
                .text_value(format!("{:.0}", p.y))
        })
        .collect();

    let widget = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(widget, area);
}

/// One bar group per x value (unemployment rate), one colored bar per group
/// key (vehicle type), with a legend row underneath.
fn draw_grouped_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let keys = chart.groups();
    let clusters = grouped_bars(chart);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let bars_total = clusters.iter().map(|(_, bars)| bars.len()).sum::<usize>().max(1) as u16;
    let gaps = clusters.len() as u16;
    let bar_width = (parts[0].width.saturating_sub(gaps + bars_total) / bars_total).clamp(1, 6);

    let mut widget = BarChart::default().bar_width(bar_width).bar_gap(0).group_gap(1);
    for (label, bars) in &clusters {
        let bars: Vec<Bar> = bars
            .iter()
            .map(|&(key, y)| {
                let (r, g, b) = PALETTE[key % PALETTE.len()];
                Bar::default()
                    .value(y.max(0.0).round() as u64)
                    .text_value(String::new())
                    .style(Style::default().fg(Color::Rgb(r, g, b)))
            })
            .collect();
        widget = widget.data(BarGroup::default().label(Line::from(label.clone())).bars(&bars));
    }
    frame.render_widget(widget, parts[0]);

    let legend: Vec<Span> = keys
        .iter()
        .enumerate()
        .flat_map(|(i, name)| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            [
                Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                Span::raw(format!("{name}  ")),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(legend)), parts[1]);
}

fn draw_share_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let width = area.width.saturating_sub(32).max(4) as usize;
    let lines: Vec<Line> = share_rows(chart)
        .into_iter()
        .enumerate()
        .map(|(i, (label, share))| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            let filled = (share * width as f64).round() as usize;
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                Span::raw(format!("{label:<18} {:>5.1}% ", share * 100.0)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Rgb(r, g, b))),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

/// The chart's series as one polyline.
///
/// Categorical x values are mapped to their position in the series.
fn plot_line(chart: &ChartSpec) -> PlotLine {
    let (r, g, b) = PALETTE[0];
    PlotLine {
        color: RGBColor(r, g, b),
        points: chart
            .series
            .iter()
            .enumerate()
            .map(|(i, p)| (p.x.as_number().unwrap_or(i as f64), p.y))
            .collect(),
    }
}

/// `(x label, [(group index, y)])` per x value, in series order. Group
/// indices follow `ChartSpec::groups`, so colors stay stable across clusters.
fn grouped_bars(chart: &ChartSpec) -> Vec<(String, Vec<(usize, f64)>)> {
    let keys = chart.groups();
    let mut clusters: Vec<(String, Vec<(usize, f64)>)> = Vec::new();
    for p in &chart.series {
        let label = p.x.label();
        let key = p
            .group
            .as_deref()
            .and_then(|g| keys.iter().position(|k| *k == g))
            .unwrap_or(0);
        match clusters.last_mut() {
            Some((last, bars)) if *last == label => bars.push((key, p.y)),
            _ => clusters.push((label, vec![(key, p.y)])),
        }
    }
    clusters
}

fn plot_bounds(lines: &[PlotLine]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in lines.iter().flat_map(|l| l.points.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        (x_min, x_max) = (0.0, 1.0);
    } else if x_max <= x_min {
        (x_min, x_max) = (x_min - 0.5, x_max + 0.5);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        (y_min, y_max) = (0.0, 1.0);
    } else if y_max <= y_min {
        (y_min, y_max) = (y_min - 1.0, y_max + 1.0);
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ([x_min, x_max], [y_min - pad, y_max + pad])
}

/// `(label, share in 0..=1)` per slice; an all-zero pie yields zero shares.
fn share_rows(chart: &ChartSpec) -> Vec<(String, f64)> {
    let total: f64 = chart.series.iter().map(|p| p.y.max(0.0)).sum();
    chart
        .series
        .iter()
        .map(|p| {
            let share = if total > 0.0 { p.y.max(0.0) / total } else { 0.0 };
            (p.x.label(), share)
        })
        .collect()
}

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else {
        format!("{v:.0}")
    }
}
