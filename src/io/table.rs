//! Helpers shared by the SED grid and noise-model readers.

use std::fs::File;
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::AppError;

/// On-disk layout of a table, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "json" => Ok(TableFormat::Json),
            other => Err(AppError::input(format!(
                "Unsupported file extension '.{other}' for '{}' (expected .csv or .json).",
                path.display()
            ))),
        }
    }
}

/// Open `path` for reading; `what` names the file in error messages.
pub(crate) fn open(path: &Path, what: &str) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::input(format!("Failed to open {what} '{}': {e}", path.display())))
}

pub(crate) fn csv_reader(file: File) -> csv::Reader<File> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file)
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

pub(crate) fn parse_cell(value: &str, line: usize, column: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::data(format!("Line {line}, column `{column}`: '{value}' is not a number.")))
}

/// Build a matrix from row-major nested vectors.
///
/// `empty_cols` is the column count to use when there are no rows at all.
pub(crate) fn matrix_from_rows(rows: Vec<Vec<f64>>, empty_cols: usize, what: &str) -> Result<DMatrix<f64>, AppError> {
    let ncols = rows.first().map(Vec::len).unwrap_or(empty_cols);
    let nrows = rows.len();

    let mut flat = Vec::with_capacity(nrows * ncols);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != ncols {
            return Err(AppError::data(format!(
                "{what}: row {i} has {} values, expected {ncols}.",
                row.len()
            )));
        }
        flat.extend(row);
    }

    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

/// Row-major view of a matrix, for serialization.
pub(crate) fn matrix_rows(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

pub(crate) fn csv_err(path: &Path, e: csv::Error) -> AppError {
    match e.kind() {
        csv::ErrorKind::Io(_) => AppError::input(format!("Failed to read '{}': {e}", path.display())),
        _ => AppError::data(format!("Malformed CSV '{}': {e}", path.display())),
    }
}
