//! Exports: layout JSON, per-chart series CSVs, and dataset CSVs.
//!
//! Layout JSON is the portable form of a recomputation, meant for renderers
//! other than the bundled TUI.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controller::{DashboardView, Notice, ViewState};
use crate::domain::{ChartLayout, Dataset, Selection, month_abbrev};
use crate::error::AppError;

/// On-disk schema for `autosales export`.
#[derive(Debug, Serialize)]
pub struct ExportedLayout<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub dataset: &'a str,
    pub selection: Selection,
    pub state: ViewState,
    pub year_input_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'a Notice>,
    pub layout: &'a ChartLayout,
}

impl<'a> ExportedLayout<'a> {
    pub fn new(view: &'a DashboardView, dataset: &'a str) -> Self {
        Self {
            tool: "autosales",
            generated_at: Utc::now(),
            dataset,
            selection: view.selection,
            state: view.state,
            year_input_disabled: view.year_input_disabled,
            notice: view.notice.as_ref(),
            layout: &view.layout,
        }
    }
}

/// Write a view as pretty-printed JSON.
pub fn write_layout_json(path: &Path, view: &DashboardView, dataset: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create layout JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &ExportedLayout::new(view, dataset))
        .map_err(|e| AppError::new(2, format!("Failed to write layout JSON: {e}")))?;
    tracing::info!(path = %path.display(), charts = view.layout.len(), "wrote layout JSON");
    Ok(())
}

/// Write one CSV per chart into `dir`; returns the written paths in chart order.
pub fn write_series_csvs(dir: &Path, layout: &ChartLayout) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create series dir '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(layout.len());
    for (idx, chart) in layout.charts().enumerate() {
        let path = dir.join(format!("chart{}_{}.csv", idx + 1, slug(&chart.title)));
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

        let mut header = vec![chart.x_field.as_str(), chart.y_field.as_str()];
        if let Some(color) = chart.color_field.as_deref() {
            header.push(color);
        }
        writer
            .write_record(&header)
            .map_err(|e| AppError::new(2, format!("Failed to write series CSV header: {e}")))?;

        for p in &chart.series {
            let mut row = vec![p.x.label(), format!("{:.4}", p.y)];
            if chart.color_field.is_some() {
                row.push(p.group.clone().unwrap_or_default());
            }
            writer
                .write_record(&row)
                .map_err(|e| AppError::new(2, format!("Failed to write series CSV row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))?;
        written.push(path);
    }
    Ok(written)
}

/// Write a dataset in the same column layout the ingest layer reads.
pub fn write_dataset_csv<W: Write>(out: W, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record([
            "Year",
            "Month",
            "Recession",
            "Advertising_Expenditure",
            "unemployment_rate",
            "Automobile_Sales",
            "Vehicle_Type",
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write dataset header: {e}")))?;

    for r in dataset.records() {
        writer
            .write_record([
                r.year.to_string(),
                month_abbrev(r.month).to_string(),
                u8::from(r.recession).to_string(),
                format!("{:.2}", r.advertising_expenditure),
                format!("{:.1}", r.unemployment_rate),
                format!("{:.2}", r.automobile_sales),
                r.vehicle_type.clone(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write dataset row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush dataset CSV: {e}")))?;
    Ok(())
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
