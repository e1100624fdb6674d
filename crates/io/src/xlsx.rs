// Spreadsheet import (xlsx, xls, ods) via calamine.
//
// Only the first sheet is read. Cells keep the type calamine gives them;
// dates arrive as serial numbers and error cells as text.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use stockcheck_recon::{Cell, Grid};

use crate::error::IngestionError;

/// Import the first sheet of a workbook as a grid.
///
/// When the used range does not start at A1, leading rows and columns are
/// padded with empty cells so positions stay absolute.
pub fn import_first_sheet(path: &Path) -> Result<Grid, IngestionError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| IngestionError::spreadsheet(path, format!("failed to open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::spreadsheet(path, "workbook contains no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestionError::spreadsheet(path, format!("failed to read sheet '{sheet_name}': {e}")))?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        log::debug!("{}: sheet '{}' is empty", path.display(), sheet_name);
        return Ok(Grid::default());
    }

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }

    log::debug!(
        "{}: sheet '{}' {}x{} at ({}, {})",
        path.display(),
        sheet_name,
        height,
        width,
        start_row,
        start_col
    );

    Ok(Grid::new(rows))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::String(s.clone())
            }
        }
        Data::Float(n) => Cell::Float(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Store error as text representation
        Data::Error(e) => Cell::String(format!("#{:?}", e)),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::String(s.clone()),
    }
}
