//! Physical count extraction: one product per column, one weighing per row.

use std::collections::HashMap;

use crate::config::CountLayout;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::grid::Grid;
use crate::model::CountProduct;

/// Per-column tally of the weighing rows.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ColumnTally {
    pieces: u32,
    weight_kg: f64,
    ignored: usize,
}

fn tally_column(grid: &Grid, col: usize, first_data_row: usize) -> ColumnTally {
    let mut tally = ColumnTally::default();
    for row in first_data_row..grid.height() {
        let cell = grid.cell(row, col);
        if cell.is_empty() {
            continue;
        }
        match cell.as_number() {
            Some(n) if n > 0.0 => {
                tally.pieces += 1;
                tally.weight_kg += n;
            }
            _ => tally.ignored += 1,
        }
    }
    tally
}

/// Extract counted products from a count sheet.
///
/// Columns missing a code or a name are skipped, and so are columns without
/// a single positive entry: those products count as absent from the sheet,
/// not as counted at zero. A sheet shorter than the layout floor yields
/// nothing. Columns repeating a code are summed into one product.
pub fn extract_counts(grid: &Grid, layout: &CountLayout, diags: &mut Diagnostics) -> Vec<CountProduct> {
    if grid.height() < layout.min_rows() {
        diags.push(Diagnostic::CountGridTooShort {
            rows: grid.height(),
            required: layout.min_rows(),
        });
        return Vec::new();
    }

    let width = grid.row(layout.code_row).len().max(grid.row(layout.name_row).len());
    let mut products: Vec<CountProduct> = Vec::new();
    let mut by_code: HashMap<String, usize> = HashMap::new();

    for col in 0..width {
        let code = grid.cell(layout.code_row, col).as_text().trim().to_string();
        let name = grid.cell(layout.name_row, col).as_text().trim().to_string();

        if code.is_empty() || name.is_empty() {
            if !(code.is_empty() && name.is_empty()) {
                diags.push(Diagnostic::CountColumnIncomplete { column: col, code, name });
            }
            continue;
        }

        let tally = tally_column(grid, col, layout.first_data_row);
        if tally.ignored > 0 {
            diags.push(Diagnostic::CountEntriesIgnored {
                column: col,
                code: code.clone(),
                entries: tally.ignored,
            });
        }
        if tally.weight_kg <= 0.0 {
            diags.push(Diagnostic::CountColumnEmpty { column: col, code });
            continue;
        }

        log::debug!(
            "count column {}: {} '{}' {} piece(s), {} kg",
            col + 1,
            code,
            name,
            tally.pieces,
            tally.weight_kg
        );

        match by_code.get(&code) {
            Some(&idx) => {
                let existing = &mut products[idx];
                existing.counted_pieces += tally.pieces;
                existing.counted_weight_kg += tally.weight_kg;
                existing.columns.push(col);
            }
            None => {
                by_code.insert(code.clone(), products.len());
                products.push(CountProduct {
                    code,
                    name,
                    counted_pieces: tally.pieces,
                    counted_weight_kg: tally.weight_kg,
                    columns: vec![col],
                });
            }
        }
    }

    for p in products.iter().filter(|p| p.columns.len() > 1) {
        diags.push(Diagnostic::DuplicateCountCode {
            code: p.code.clone(),
            columns: p.columns.clone(),
        });
    }

    products
}
