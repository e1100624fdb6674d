//! `stockcheck-recon`: ledger vs. physical count reconciliation engine.
//!
//! Pure engine crate: receives raw grids, returns variance records,
//! a summary and diagnostics. No CLI or IO dependencies.

pub mod config;
pub mod count;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod model;
pub mod summary;

pub use config::AuditConfig;
pub use diagnostics::Diagnostic;
pub use engine::{run, sort_by_deviation};
pub use error::ReconError;
pub use grid::{Cell, Grid};
pub use model::{ReconResult, ReconSummary, VarianceRecord, VarianceStatus};
