//! CSV ingest and validation.
//!
//! This module is responsible for turning the sales CSV into a clean, typed,
//! immutable [`Dataset`].
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No partial tables**: either a usable dataset comes back, or an error

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Month;
use csv::StringRecord;

use crate::aggregate::fields;
use crate::domain::{Dataset, Record, RowError, YEAR_MAX, YEAR_MIN};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 7] = [
    fields::YEAR,
    fields::MONTH,
    fields::VEHICLE_TYPE,
    fields::AUTOMOBILE_SALES,
    fields::ADVERTISING_EXPENDITURE,
    fields::UNEMPLOYMENT_RATE,
    fields::RECESSION,
];

/// Load a dataset from a CSV file on disk.
pub fn load_csv_file(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file, &path.display().to_string())
}

/// Parse and validate a dataset from any CSV byte stream.
pub fn read_dataset<R: Read>(input: R, source: &str) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        tracing::warn!(
            skipped = row_errors.len(),
            first_line = row_errors[0].line,
            first_error = %row_errors[0].message,
            "skipped invalid dataset rows"
        );
    }

    Dataset::new(records, source, rows_read, row_errors)
        .ok_or_else(|| AppError::new(3, format!("No valid rows in dataset '{source}'.")))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(&c.to_ascii_lowercase()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Missing required column(s): {}", missing.join(", ")),
        ))
    }
}

fn parse_row(row: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Record, String> {
    let year = parse_year(get_required(row, header_map, fields::YEAR)?)?;
    let month = parse_month(get_required(row, header_map, fields::MONTH)?)?;
    let vehicle_type = get_required(row, header_map, fields::VEHICLE_TYPE)?.to_string();

    let automobile_sales = parse_non_negative(row, header_map, fields::AUTOMOBILE_SALES)?;
    let advertising_expenditure = parse_non_negative(row, header_map, fields::ADVERTISING_EXPENDITURE)?;
    let unemployment_rate = parse_non_negative(row, header_map, fields::UNEMPLOYMENT_RATE)?;
    let recession = parse_flag(get_required(row, header_map, fields::RECESSION)?)?;

    Ok(Record {
        year,
        month,
        vehicle_type,
        automobile_sales,
        advertising_expenditure,
        unemployment_rate,
        recession,
    })
}

fn get_required<'a>(row: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<&'a str, String> {
    let idx = header_map
        .get(&name.to_ascii_lowercase())
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    row.get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_year(s: &str) -> Result<i32, String> {
    let year = s
        .parse::<i32>()
        .map_err(|_| format!("Invalid `Year` '{s}'."))?;
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(format!("`Year` {year} outside {YEAR_MIN}..={YEAR_MAX}."));
    }
    Ok(year)
}

fn parse_month(s: &str) -> Result<Month, String> {
    // chrono accepts both "Jan" and "January", case-insensitively.
    s.parse::<Month>().map_err(|_| format!("Invalid `Month` '{s}'."))
}

fn parse_non_negative(row: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let raw = get_required(row, header_map, name)?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` '{raw}'."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("`{name}` must be finite and >= 0 (got {raw})."));
    }
    Ok(v)
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        _ => Err(format!("Invalid `Recession` flag '{s}'.")),
    }
}
