use serde::Serialize;

use crate::diagnostics::Diagnostic;

// ---------------------------------------------------------------------------
// Extracted products
// ---------------------------------------------------------------------------

/// One qualifying ledger row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemProduct {
    pub code: String,
    /// Display name, original casing.
    pub name: String,
    pub stock_quantity_kg: f64,
    pub unit_cost_per_kg: f64,
    /// Zero-based row in the ledger sheet.
    pub row: usize,
}

/// One counted product, aggregated over all weighings in its column(s).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountProduct {
    pub code: String,
    pub name: String,
    pub counted_pieces: u32,
    pub counted_weight_kg: f64,
    /// Zero-based source columns; more than one when the code was repeated.
    pub columns: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Variance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Present in both sources.
    Matched,
    /// In the ledger, never counted.
    Uncounted,
    /// Counted, not in the ledger.
    Unlisted,
}

impl std::fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Uncounted => write!(f, "uncounted"),
            Self::Unlisted => write!(f, "unlisted"),
        }
    }
}

/// One output row per product code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceRecord {
    pub date: String,
    pub code: String,
    pub product_name: String,
    pub system_quantity_kg: f64,
    pub physical_quantity_kg: f64,
    pub counted_pieces: u32,
    /// physical - system. Positive is surplus, negative is shortage.
    pub delta_kg: f64,
    pub unit_cost_per_kg: f64,
    /// delta_kg * unit_cost_per_kg
    pub value_delta: f64,
    pub status: VarianceStatus,
    pub significant: bool,
}

impl VarianceRecord {
    pub fn is_surplus(&self) -> bool {
        self.delta_kg > 0.0
    }

    pub fn is_shortage(&self) -> bool {
        self.delta_kg < 0.0
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_products: usize,
    pub matched: usize,
    pub uncounted: usize,
    pub unlisted: usize,
    pub surplus_count: usize,
    pub shortage_count: usize,
    pub exact_count: usize,
    pub significant_count: usize,
    pub total_system_kg: f64,
    pub total_physical_kg: f64,
    pub total_delta_kg: f64,
    pub surplus_kg: f64,
    /// Absolute value.
    pub shortage_kg: f64,
    pub total_value_delta: f64,
    pub surplus_value: f64,
    /// Absolute value.
    pub shortage_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub run_date: chrono::NaiveDate,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<VarianceRecord>,
    pub diagnostics: Vec<Diagnostic>,
}
