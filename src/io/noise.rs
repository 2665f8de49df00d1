//! Noise-model catalog read/write.
//!
//! Layouts:
//! - CSV: one row per object; columns `error_<k>`, `bias_<k>`, `completeness_<k>`
//!   taken in header order, so column `k` of each quantity is filter `k`.
//!   Unrelated columns are ignored.
//! - JSON: `{"error": [[...]], "bias": [[...]], "completeness": [[...]]}`

use std::fs::File;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::NoiseModel;
use crate::error::AppError;
use crate::io::table::{self, TableFormat};

#[derive(Debug, Serialize, Deserialize)]
struct NoiseFile {
    error: Vec<Vec<f64>>,
    bias: Vec<Vec<f64>>,
    completeness: Vec<Vec<f64>>,
}

/// Read a noise-model catalog, dispatching on the file extension.
pub fn read_noise_model(path: &Path) -> Result<NoiseModel, AppError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_noise_csv(path),
        TableFormat::Json => read_noise_json(path),
    }
}

/// Column indices of each quantity, in header order.
#[derive(Debug, Default)]
struct QuantityColumns {
    error: Vec<usize>,
    bias: Vec<usize>,
    completeness: Vec<usize>,
}

fn classify_columns(headers: &csv::StringRecord) -> QuantityColumns {
    let mut cols = QuantityColumns::default();
    for (idx, raw) in headers.iter().enumerate() {
        let name = table::normalize_header_name(raw);
        if has_quantity_prefix(&name, "error") {
            cols.error.push(idx);
        } else if has_quantity_prefix(&name, "bias") {
            cols.bias.push(idx);
        } else if has_quantity_prefix(&name, "completeness") {
            cols.completeness.push(idx);
        }
    }
    cols
}

fn has_quantity_prefix(name: &str, quantity: &str) -> bool {
    match name.strip_prefix(quantity) {
        Some(rest) => rest.is_empty() || rest.starts_with('_'),
        None => false,
    }
}

fn read_noise_csv(path: &Path) -> Result<NoiseModel, AppError> {
    let file = table::open(path, "noise model")?;
    let mut reader = table::csv_reader(file);

    let headers = reader.headers().map_err(|e| table::csv_err(path, e))?.clone();
    let cols = classify_columns(&headers);

    if cols.error.is_empty() {
        return Err(AppError::data(format!(
            "Noise model '{}' has no `error_*` columns.",
            path.display()
        )));
    }
    let n_filters = cols.error.len();
    if cols.bias.len() != n_filters || cols.completeness.len() != n_filters {
        return Err(AppError::data(format!(
            "Noise model '{}' has {} error, {} bias and {} completeness columns; expected the same count of each.",
            path.display(),
            n_filters,
            cols.bias.len(),
            cols.completeness.len()
        )));
    }

    let mut error = Vec::new();
    let mut bias = Vec::new();
    let mut completeness = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| table::csv_err(path, e))?;
        error.push(pick_row(&record, &headers, &cols.error, line)?);
        bias.push(pick_row(&record, &headers, &cols.bias, line)?);
        completeness.push(pick_row(&record, &headers, &cols.completeness, line)?);
    }

    NoiseModel::new(
        table::matrix_from_rows(error, n_filters, "error")?,
        table::matrix_from_rows(bias, n_filters, "bias")?,
        table::matrix_from_rows(completeness, n_filters, "completeness")?,
    )
}

fn pick_row(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    columns: &[usize],
    line: usize,
) -> Result<Vec<f64>, AppError> {
    columns
        .iter()
        .map(|&c| {
            let name = headers.get(c).unwrap_or("?");
            let cell = record
                .get(c)
                .ok_or_else(|| AppError::data(format!("Line {line}: missing value for `{name}`.")))?;
            table::parse_cell(cell, line, name)
        })
        .collect()
}

fn read_noise_json(path: &Path) -> Result<NoiseModel, AppError> {
    let file = table::open(path, "noise model")?;
    let parsed: NoiseFile = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid noise model JSON '{}': {e}", path.display())))?;

    let width = parsed.error.first().map(Vec::len).unwrap_or(0);
    NoiseModel::new(
        table::matrix_from_rows(parsed.error, width, "error")?,
        table::matrix_from_rows(parsed.bias, width, "bias")?,
        table::matrix_from_rows(parsed.completeness, width, "completeness")?,
    )
}

/// Write a noise-model catalog in the CSV layout.
pub fn write_noise_model_csv(path: &Path, model: &NoiseModel) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create noise model '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let (n_objects, n_filters) = model.shape();
    let parts: [(&str, &DMatrix<f64>); 3] = [
        ("error", &model.error),
        ("bias", &model.bias),
        ("completeness", &model.completeness),
    ];

    let header: Vec<String> = parts
        .iter()
        .flat_map(|(name, _)| (0..n_filters).map(move |k| format!("{name}_{k}")))
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| AppError::input(format!("Failed to write noise model header: {e}")))?;

    for i in 0..n_objects {
        let row = parts
            .iter()
            .flat_map(|(_, m)| (0..n_filters).map(move |k| m[(i, k)].to_string()));
        writer
            .write_record(row)
            .map_err(|e| AppError::input(format!("Failed to write noise model row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush noise model '{}': {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_catalog_in_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.csv");
        std::fs::write(
            &path,
            "id,error_0,error_1,bias_0,bias_1,completeness_0,completeness_1\n\
             a,1.0,-1.0,0.1,0.2,0.9,0.8\n\
             b,2.0,3.0,0.3,0.4,0.7,0.6\n",
        )
        .unwrap();

        let model = read_noise_model(&path).unwrap();
        assert_eq!(model.shape(), (2, 2));
        assert_eq!(model.error[(0, 1)], -1.0);
        assert_eq!(model.bias[(1, 0)], 0.3);
        assert_eq!(model.completeness[(1, 1)], 0.6);
    }

    #[test]
    fn csv_header_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.csv");
        std::fs::write(&path, "\u{feff}ERROR_F475W,Bias_F475W,Completeness_F475W\n1,0,1\n").unwrap();

        let model = read_noise_model(&path).unwrap();
        assert_eq!(model.shape(), (1, 1));
    }

    #[test]
    fn prefix_must_end_at_separator() {
        assert!(has_quantity_prefix("error_0", "error"));
        assert!(has_quantity_prefix("error", "error"));
        assert!(!has_quantity_prefix("errorbar", "error"));
        assert!(!has_quantity_prefix("bias_0", "error"));
    }

    #[test]
    fn mismatched_quantity_columns_are_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.csv");
        std::fs::write(&path, "error_0,error_1,bias_0,completeness_0\n1,1,0,1\n").unwrap();

        let err = read_noise_model(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("2 error, 1 bias and 1 completeness"), "{err}");
    }

    #[test]
    fn reads_json_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.json");
        std::fs::write(
            &path,
            r#"{"error": [[1.0, 2.0]], "bias": [[0.0, 0.1]], "completeness": [[1.0, 0.5]]}"#,
        )
        .unwrap();

        let model = read_noise_model(&path).unwrap();
        assert_eq!(model.shape(), (1, 2));
        assert_eq!(model.completeness[(0, 1)], 0.5);
    }

    #[test]
    fn csv_writer_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.csv");
        let model = NoiseModel::new(
            DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 2.0, 3.0]),
            DMatrix::from_row_slice(2, 2, &[0.1, 0.2, 0.3, 0.4]),
            DMatrix::from_row_slice(2, 2, &[0.9, 0.8, 0.7, 0.6]),
        )
        .unwrap();

        write_noise_model_csv(&path, &model).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("error_0,error_1,bias_0,bias_1,completeness_0,completeness_1\n"));
        assert_eq!(read_noise_model(&path).unwrap(), model);
    }

    #[test]
    fn unwritable_destination_is_an_input_error() {
        let model = NoiseModel::new(
            DMatrix::from_element(1, 1, 1.0),
            DMatrix::from_element(1, 1, 0.0),
            DMatrix::from_element(1, 1, 1.0),
        )
        .unwrap();
        let err = write_noise_model_csv(Path::new("/nope/noise.csv"), &model).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_catalog_is_an_input_error() {
        let err = read_noise_model(Path::new("/nope/noise.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
