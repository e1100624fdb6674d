use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::config::{AuditConfig, UnlistedPolicy};
use crate::count::extract_counts;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ReconError;
use crate::grid::Grid;
use crate::ledger::{extract_ledger, index_by_code};
use crate::model::{
    CountProduct, ReconMeta, ReconResult, SystemProduct, VarianceRecord, VarianceStatus,
};
use crate::summary::compute_summary;

/// Run the audit on two raw sheets. Returns variance records + summary + diagnostics.
pub fn run(
    config: &AuditConfig,
    ledger: &Grid,
    count: &Grid,
    run_date: NaiveDate,
) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let mut diags = Diagnostics::new();
    let system = extract_ledger(ledger, config, &mut diags)?;
    let counted = extract_counts(count, &config.count, &mut diags);
    log::debug!(
        "extracted {} ledger product(s), {} counted product(s)",
        system.len(),
        counted.len()
    );

    let records = reconcile(&system, &counted, config, run_date, &mut diags)?;
    let summary = compute_summary(&records);

    log::info!(
        "reconciled {} product(s): {} matched, {} uncounted, {} unlisted, {} significant",
        summary.total_products,
        summary.matched,
        summary.uncounted,
        summary.unlisted,
        summary.significant_count,
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            run_date,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        records,
        diagnostics: diags.into_vec(),
    })
}

/// Match counted products against the ledger by code.
///
/// Emits one record per code: counted products first (matched, or unlisted
/// when reported), then every ledger product that was never counted as a
/// full shortage.
pub fn reconcile(
    system: &[SystemProduct],
    counted: &[CountProduct],
    config: &AuditConfig,
    run_date: NaiveDate,
    diags: &mut Diagnostics,
) -> Result<Vec<VarianceRecord>, ReconError> {
    let lookup = index_by_code(system, config.policy.duplicate_codes, diags)?;
    let stamp = RecordStamp {
        date: run_date.format(&config.report.date_format).to_string(),
        threshold_kg: config.report.significant_delta_kg,
    };

    let mut records = Vec::with_capacity(lookup.len() + counted.len());
    let mut emitted: BTreeSet<&str> = BTreeSet::new();

    for c in counted {
        if !emitted.insert(c.code.as_str()) {
            continue;
        }
        match lookup.get(&c.code) {
            Some(s) => records.push(stamp.record(
                &s.code,
                &s.name,
                s.stock_quantity_kg,
                c.counted_weight_kg,
                c.counted_pieces,
                s.unit_cost_per_kg,
                VarianceStatus::Matched,
            )),
            None => {
                let dropped = config.policy.unlisted_counts == UnlistedPolicy::Drop;
                diags.push(Diagnostic::UnlistedCount {
                    code: c.code.clone(),
                    name: c.name.clone(),
                    dropped,
                });
                if !dropped {
                    records.push(stamp.record(
                        &c.code,
                        &c.name,
                        0.0,
                        c.counted_weight_kg,
                        c.counted_pieces,
                        0.0,
                        VarianceStatus::Unlisted,
                    ));
                }
            }
        }
    }

    for (code, s) in &lookup {
        if emitted.contains(code.as_str()) {
            continue;
        }
        records.push(stamp.record(
            code,
            &s.name,
            s.stock_quantity_kg,
            0.0,
            0,
            s.unit_cost_per_kg,
            VarianceStatus::Uncounted,
        ));
    }

    Ok(records)
}

/// Run-wide values shared by every record.
struct RecordStamp {
    date: String,
    threshold_kg: f64,
}

impl RecordStamp {
    #[allow(clippy::too_many_arguments)]
    fn record(
        &self,
        code: &str,
        name: &str,
        system_kg: f64,
        physical_kg: f64,
        pieces: u32,
        unit_cost: f64,
        status: VarianceStatus,
    ) -> VarianceRecord {
        let delta_kg = physical_kg - system_kg;
        VarianceRecord {
            date: self.date.clone(),
            code: code.to_string(),
            product_name: name.to_string(),
            system_quantity_kg: system_kg,
            physical_quantity_kg: physical_kg,
            counted_pieces: pieces,
            delta_kg,
            unit_cost_per_kg: unit_cost,
            value_delta: delta_kg * unit_cost,
            status,
            significant: delta_kg.abs() > self.threshold_kg,
        }
    }
}

/// Order records by absolute delta, largest first; ties by code.
pub fn sort_by_deviation(records: &mut [VarianceRecord]) {
    records.sort_by(|a, b| {
        b.delta_kg
            .abs()
            .total_cmp(&a.delta_kg.abs())
            .then_with(|| a.code.cmp(&b.code))
    });
}
