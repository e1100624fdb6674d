//! `stockcheck-io`: reads ledger and count files into raw grids.
//!
//! Spreadsheets (`.ods`, `.xlsx`, `.xls`) go through calamine, first sheet
//! only; `.csv`/`.tsv` are read as delimited text. No semantic validation.

pub mod csv;
pub mod error;
pub mod xlsx;

use std::path::Path;

use stockcheck_recon::Grid;

pub use error::IngestionError;

/// Input container, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Ods,
    Xlsx,
    Xls,
    Csv,
    Tsv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "ods" => Ok(Self::Ods),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(IngestionError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

/// Read one file into a grid.
pub fn load_grid(path: &Path) -> Result<Grid, IngestionError> {
    let format = InputFormat::from_path(path)?;

    // calamine folds a missing file into its own error; report it as IO
    if let Err(e) = std::fs::metadata(path) {
        return Err(IngestionError::io(path, e.to_string()));
    }

    let grid = match format {
        InputFormat::Ods | InputFormat::Xlsx | InputFormat::Xls => xlsx::import_first_sheet(path)?,
        InputFormat::Csv => csv::import(path)?,
        InputFormat::Tsv => csv::import_tsv(path)?,
    };

    log::info!(
        "loaded {} ({:?}): {} row(s), {} column(s)",
        path.display(),
        format,
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

/// Read the ledger and the count file concurrently.
///
/// Both reads must succeed; when both fail the ledger error is returned.
pub fn load_pair(ledger: &Path, count: &Path) -> Result<(Grid, Grid), IngestionError> {
    let (ledger_result, count_result) = std::thread::scope(|s| {
        let ledger_handle = s.spawn(|| load_grid(ledger));
        let count_handle = s.spawn(|| load_grid(count));
        (
            ledger_handle
                .join()
                .unwrap_or_else(|_| Err(IngestionError::spreadsheet(ledger, "reader thread panicked"))),
            count_handle
                .join()
                .unwrap_or_else(|_| Err(IngestionError::spreadsheet(count, "reader thread panicked"))),
        )
    });
    Ok((ledger_result?, count_result?))
}
