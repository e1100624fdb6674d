//! Ledger (system-of-record) extraction: one product per row.

use std::collections::BTreeMap;

use crate::config::{AuditConfig, CategoryFilter, ColumnRef, DuplicatePolicy, LedgerColumns};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ReconError;
use crate::grid::{Cell, Grid};
use crate::model::SystemProduct;

/// Ledger column positions after header names have been looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub code: usize,
    pub name: usize,
    pub quantity: usize,
    pub cost: usize,
}

impl ResolvedColumns {
    /// Narrowest row that still holds every mapped column.
    pub fn min_width(&self) -> usize {
        self.code.max(self.name).max(self.quantity).max(self.cost) + 1
    }
}

/// Resolve the configured columns against the first header row.
pub fn resolve_columns(columns: &LedgerColumns, header: &[Cell]) -> Result<ResolvedColumns, ReconError> {
    Ok(ResolvedColumns {
        code: resolve_one(&columns.code, "code", header)?,
        name: resolve_one(&columns.name, "name", header)?,
        quantity: resolve_one(&columns.quantity, "quantity", header)?,
        cost: resolve_one(&columns.cost, "cost", header)?,
    })
}

fn resolve_one(column: &ColumnRef, field: &'static str, header: &[Cell]) -> Result<usize, ReconError> {
    match column {
        ColumnRef::Index(idx) => Ok(*idx),
        ColumnRef::Header(name) => {
            let wanted = name.trim().to_lowercase();
            header
                .iter()
                .position(|cell| cell.as_text().trim().to_lowercase() == wanted)
                .ok_or_else(|| ReconError::MissingColumn {
                    field,
                    header: name.clone(),
                })
        }
    }
}

/// Extract the ledger products that pass the category filter.
///
/// Rows whose last filled cell falls short of the mapped columns are
/// skipped, and non-numeric
/// quantity or cost cells read as zero; both leave a diagnostic.
pub fn extract_ledger(
    grid: &Grid,
    config: &AuditConfig,
    diags: &mut Diagnostics,
) -> Result<Vec<SystemProduct>, ReconError> {
    let layout = &config.ledger;
    let cols = resolve_columns(&layout.columns, grid.row(0))?;
    let min_width = cols.min_width();

    let mut products = Vec::new();
    for (row_idx, row) in grid.rows().iter().enumerate().skip(layout.header_rows) {
        let width = filled_width(row);
        if width < min_width {
            if width > 0 {
                diags.push(Diagnostic::LedgerRowTooNarrow {
                    row: row_idx,
                    width,
                    required: min_width,
                });
            }
            continue;
        }

        if let Some(product) = extract_row(row_idx, row, &cols, &config.category, diags) {
            log::debug!(
                "ledger row {}: {} '{}' {} kg @ {}",
                row_idx + 1,
                product.code,
                product.name,
                product.stock_quantity_kg,
                product.unit_cost_per_kg
            );
            products.push(product);
        }
    }

    Ok(products)
}

/// Row width up to the last non-empty cell. Spreadsheet readers pad rows to
/// the sheet's used range, so trailing blanks do not count.
fn filled_width(row: &[Cell]) -> usize {
    row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1)
}

fn extract_row(
    row_idx: usize,
    row: &[Cell],
    cols: &ResolvedColumns,
    category: &CategoryFilter,
    diags: &mut Diagnostics,
) -> Option<SystemProduct> {
    let name = row[cols.name].as_text();
    if !category.matches(&name) {
        return None;
    }

    let code = row[cols.code].as_text().trim().to_string();
    if code.is_empty() {
        diags.push(Diagnostic::LedgerEmptyCode {
            row: row_idx,
            name: name.trim().to_string(),
        });
        return None;
    }

    let stock_quantity_kg = coerce_number(&row[cols.quantity], row_idx, "quantity", diags);
    let unit_cost_per_kg = coerce_number(&row[cols.cost], row_idx, "cost", diags);

    Some(SystemProduct {
        code,
        name,
        stock_quantity_kg,
        unit_cost_per_kg,
        row: row_idx,
    })
}

fn coerce_number(cell: &Cell, row: usize, field: &'static str, diags: &mut Diagnostics) -> f64 {
    match cell.as_number() {
        Some(n) => n,
        None => {
            if !cell.is_empty() {
                diags.push(Diagnostic::LedgerCellCoerced {
                    row,
                    field,
                    value: cell.as_text(),
                });
            }
            0.0
        }
    }
}

/// Build the code lookup. Later rows overwrite earlier ones unless the
/// policy rejects duplicates.
pub fn index_by_code(
    products: &[SystemProduct],
    policy: DuplicatePolicy,
    diags: &mut Diagnostics,
) -> Result<BTreeMap<String, SystemProduct>, ReconError> {
    let mut rows_by_code: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for p in products {
        rows_by_code.entry(p.code.as_str()).or_default().push(p.row);
    }

    for (code, rows) in rows_by_code.into_iter().filter(|(_, rows)| rows.len() > 1) {
        match policy {
            DuplicatePolicy::Reject => {
                return Err(ReconError::DuplicateCode {
                    code: code.to_string(),
                    rows,
                });
            }
            DuplicatePolicy::LastWins => diags.push(Diagnostic::DuplicateLedgerCode {
                code: code.to_string(),
                rows,
            }),
        }
    }

    let mut lookup = BTreeMap::new();
    for p in products {
        lookup.insert(p.code.clone(), p.clone());
    }
    Ok(lookup)
}
