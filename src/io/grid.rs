//! SED grid read/write.
//!
//! Layouts:
//! - CSV: header row of filter names, one row of fluxes per object
//! - JSON: `{"filters": [...], "seds": [[...], ...]}` (rows are objects)

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::SedGrid;
use crate::error::AppError;
use crate::io::table::{self, TableFormat};

#[derive(Debug, Serialize, Deserialize)]
struct GridFile {
    filters: Vec<String>,
    seds: Vec<Vec<f64>>,
}

/// Read an SED grid, dispatching on the file extension.
pub fn read_sed_grid(path: &Path) -> Result<SedGrid, AppError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_grid_csv(path),
        TableFormat::Json => read_grid_json(path),
    }
}

fn read_grid_csv(path: &Path) -> Result<SedGrid, AppError> {
    let file = table::open(path, "SED grid")?;
    let mut reader = table::csv_reader(file);

    let filters: Vec<String> = reader
        .headers()
        .map_err(|e| table::csv_err(path, e))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    if filters.iter().any(String::is_empty) {
        return Err(AppError::data(format!(
            "SED grid '{}' has an empty filter name in its header.",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header.
        let line = idx + 2;
        let record = result.map_err(|e| table::csv_err(path, e))?;
        let row = record
            .iter()
            .zip(filters.iter())
            .map(|(cell, filter)| table::parse_cell(cell, line, filter))
            .collect::<Result<Vec<f64>, AppError>>()?;
        rows.push(row);
    }

    let seds = table::matrix_from_rows(rows, filters.len(), "SED grid")?;
    SedGrid::new(seds, filters)
}

fn read_grid_json(path: &Path) -> Result<SedGrid, AppError> {
    let file = table::open(path, "SED grid")?;
    let parsed: GridFile = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid SED grid JSON '{}': {e}", path.display())))?;

    let seds = table::matrix_from_rows(parsed.seds, parsed.filters.len(), "SED grid")?;
    SedGrid::new(seds, parsed.filters)
}

/// Write an SED grid in the CSV layout.
pub fn write_sed_grid_csv(path: &Path, grid: &SedGrid) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create SED grid '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(&grid.filters)
        .map_err(|e| AppError::input(format!("Failed to write SED grid header: {e}")))?;
    for row in grid.seds.row_iter() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| AppError::input(format!("Failed to write SED grid row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush SED grid '{}': {e}", path.display())))?;

    Ok(())
}

/// Write an SED grid in the JSON layout.
pub fn write_sed_grid_json(path: &Path, grid: &SedGrid) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create SED grid '{}': {e}", path.display())))?;
    let out = GridFile {
        filters: grid.filters.clone(),
        seds: table::matrix_rows(&grid.seds),
    };
    serde_json::to_writer(file, &out).map_err(|e| AppError::input(format!("Failed to write SED grid JSON: {e}")))
}
