//! Non-fatal findings collected while extracting and matching.
//!
//! Malformed sheets degrade to partial results instead of failing the run;
//! these entries say what was skipped or coerced so callers can surface it.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Ledger row narrower than the widest mapped column.
    LedgerRowTooNarrow { row: usize, width: usize, required: usize },
    /// Ledger row passed the category filter but has no code.
    LedgerEmptyCode { row: usize, name: String },
    /// Non-numeric quantity or cost read as zero.
    LedgerCellCoerced { row: usize, field: &'static str, value: String },
    /// Code repeated in the ledger; the last row is the one used.
    DuplicateLedgerCode { code: String, rows: Vec<usize> },
    /// Count sheet too short to hold any entry.
    CountGridTooShort { rows: usize, required: usize },
    /// Count column with a code but no name, or a name but no code.
    CountColumnIncomplete { column: usize, code: String, name: String },
    /// Count column with no positive entry; treated as not counted.
    CountColumnEmpty { column: usize, code: String },
    /// Non-empty count cells that were not positive numbers.
    CountEntriesIgnored { column: usize, code: String, entries: usize },
    /// Code repeated across count columns; the columns were summed.
    DuplicateCountCode { code: String, columns: Vec<usize> },
    /// Counted product with no ledger row.
    UnlistedCount { code: String, name: String, dropped: bool },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LedgerRowTooNarrow { row, width, required } => write!(
                f,
                "ledger row {}: {width} column(s), need {required}; skipped",
                row + 1
            ),
            Self::LedgerEmptyCode { row, name } => {
                write!(f, "ledger row {}: '{name}' has no code; skipped", row + 1)
            }
            Self::LedgerCellCoerced { row, field, value } => {
                write!(f, "ledger row {}: {field} '{value}' is not a number; read as 0", row + 1)
            }
            Self::DuplicateLedgerCode { code, rows } => {
                let rows: Vec<String> = rows.iter().map(|r| (r + 1).to_string()).collect();
                write!(f, "ledger code '{code}' on rows {}; last row used", rows.join(", "))
            }
            Self::CountGridTooShort { rows, required } => {
                write!(f, "count sheet has {rows} row(s), need {required}; nothing counted")
            }
            Self::CountColumnIncomplete { column, code, name } => write!(
                f,
                "count column {}: code '{code}' / name '{name}' incomplete; skipped",
                column + 1
            ),
            Self::CountColumnEmpty { column, code } => {
                write!(f, "count column {} ('{code}'): no positive entries; not counted", column + 1)
            }
            Self::CountEntriesIgnored { column, code, entries } => write!(
                f,
                "count column {} ('{code}'): {entries} entr{} ignored",
                column + 1,
                if *entries == 1 { "y" } else { "ies" }
            ),
            Self::DuplicateCountCode { code, columns } => {
                let cols: Vec<String> = columns.iter().map(|c| (c + 1).to_string()).collect();
                write!(f, "count code '{code}' in columns {}; summed", cols.join(", "))
            }
            Self::UnlistedCount { code, name, dropped } => {
                if *dropped {
                    write!(f, "counted '{name}' ({code}) is not in the ledger; dropped")
                } else {
                    write!(f, "counted '{name}' ({code}) is not in the ledger; reported at zero cost")
                }
            }
        }
    }
}

/// Collector handed through the extraction passes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
