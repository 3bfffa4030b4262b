//! CSV ingest and normalization.
//!
//! This module turns a directory of per-day sales CSVs into one unified
//! in-memory dataset that is safe to analyze.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (drop bad rows, but report what happened)
//! - **Deterministic behavior** (files concatenated in sorted path order)
//! - **Separation of concerns**: no aggregation logic here
//!
//! Files are independent and read-only, so they are parsed in parallel;
//! results are concatenated in path order, which keeps the output identical
//! to a sequential load.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::StringRecord;
use rayon::prelude::*;

use crate::domain::{Gender, SaleRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest. Never fatal.
#[derive(Debug, Clone)]
pub struct RowError {
    pub file: PathBuf,
    pub line: usize,
    pub message: String,
}

/// Ingest output: the unified dataset + counts + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<SaleRecord>,
    pub files_read: usize,
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

/// Per-file parse output, merged after the parallel load.
struct FileLoad {
    records: Vec<SaleRecord>,
    rows_read: usize,
    row_errors: Vec<RowError>,
}

/// Load every sales CSV under `dir` into one dataset.
///
/// Row order is preserved within each file; across files the concatenation
/// follows sorted path order.
pub fn load_sales(dir: &Path) -> Result<IngestedData, AppError> {
    let paths = sales_files(dir)?;

    let loads: Result<Vec<FileLoad>, AppError> =
        paths.par_iter().map(|path| load_file(path)).collect();
    let loads = loads?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    for load in loads {
        rows_read += load.rows_read;
        records.extend(load.records);
        row_errors.extend(load.row_errors);
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::data_source(format!(
            "No usable rows in any sales file under '{}'.",
            dir.display()
        )));
    }

    Ok(IngestedData {
        records,
        files_read: paths.len(),
        rows_read,
        rows_used,
        row_errors,
    })
}

/// Enumerate `*.csv` files under `dir`, sorted by path.
fn sales_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AppError::data_source(format!(
            "Failed to read input directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            AppError::data_source(format!(
                "Failed to list input directory '{}': {e}",
                dir.display()
            ))
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(AppError::data_source(format!(
            "No sales CSV files found under '{}'.",
            dir.display()
        )));
    }

    paths.sort();
    Ok(paths)
}

fn load_file(path: &Path) -> Result<FileLoad, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_source(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::data_source(format!(
                "Failed to read CSV headers in '{}': {e}",
                path.display()
            ))
        })?
        .clone();

    let header_map = build_header_map(&headers);
    let time_idx = *header_map.get("sale_time").ok_or_else(|| {
        AppError::data_source(format!(
            "Missing required column `sale_time` in '{}'.",
            path.display()
        ))
    })?;
    let gender_idx = *header_map.get("purchaser_gender").ok_or_else(|| {
        AppError::data_source(format!(
            "Missing required column `purchaser_gender` in '{}'.",
            path.display()
        ))
    })?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    file: path.to_path_buf(),
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, time_idx, gender_idx) {
            Ok(rec) => records.push(rec),
            Err(message) => row_errors.push(RowError {
                file: path.to_path_buf(),
                line,
                message,
            }),
        }
    }

    Ok(FileLoad {
        records,
        rows_read,
        row_errors,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿sale_time"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, time_idx: usize, gender_idx: usize) -> Result<SaleRecord, String> {
    let raw_time = record
        .get(time_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `sale_time`".to_string())?;

    let sale_time = parse_timestamp(raw_time)?;

    // A missing gender field is data (Unknown), not an error.
    let gender = record
        .get(gender_idx)
        .map(Gender::parse_lossy)
        .unwrap_or(Gender::Unknown);

    Ok(SaleRecord { sale_time, gender })
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    // Timestamps are naive local time; we accept a small set of common
    // export formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    Err(format!(
        "Invalid `sale_time` '{s}'. Expected e.g. YYYY-MM-DD HH:MM:SS."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn loads_and_concatenates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "day2.csv",
            "sale_time,purchaser_gender\n2013-01-02 10:30:00,female\n",
        );
        write_csv(
            dir.path(),
            "day1.csv",
            "sale_time,purchaser_gender\n2013-01-01 09:00:00,male\n2013-01-01 20:15:00,male\n",
        );

        let data = load_sales(dir.path()).unwrap();
        assert_eq!(data.files_read, 2);
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.rows_used, 3);
        assert!(data.row_errors.is_empty());

        // Sorted path order: day1 rows first.
        assert_eq!(data.records[0].gender, Gender::Male);
        assert_eq!(data.records[2].gender, Gender::Female);
    }

    #[test]
    fn malformed_timestamps_are_dropped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "day1.csv",
            "sale_time,purchaser_gender\nnot-a-time,male\n2013-01-01 09:00:00,female\n",
        );

        let data = load_sales(dir.path()).unwrap();
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 2);
    }

    #[test]
    fn missing_required_column_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "day1.csv", "when,who\n2013-01-01 09:00:00,male\n");

        let err = load_sales(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_directory_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sales(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bom_prefixed_header_still_matches() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "day1.csv",
            "\u{feff}sale_time,purchaser_gender\n2013-01-01 09:00:00,male\n",
        );

        let data = load_sales(dir.path()).unwrap();
        assert_eq!(data.rows_used, 1);
    }

    #[test]
    fn fractional_seconds_parse() {
        let ts = parse_timestamp("2013-01-01 09:00:00.250").unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "09:00");
    }
}
