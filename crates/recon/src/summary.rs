use crate::model::{ReconSummary, VarianceRecord, VarianceStatus};

/// Compute summary statistics from variance records.
pub fn compute_summary(records: &[VarianceRecord]) -> ReconSummary {
    let mut s = ReconSummary {
        total_products: records.len(),
        ..Default::default()
    };

    for r in records {
        match r.status {
            VarianceStatus::Matched => s.matched += 1,
            VarianceStatus::Uncounted => s.uncounted += 1,
            VarianceStatus::Unlisted => s.unlisted += 1,
        }

        if r.is_surplus() {
            s.surplus_count += 1;
            s.surplus_kg += r.delta_kg;
            s.surplus_value += r.value_delta;
        } else if r.is_shortage() {
            s.shortage_count += 1;
            s.shortage_kg += r.delta_kg.abs();
            s.shortage_value += r.value_delta.abs();
        } else {
            s.exact_count += 1;
        }

        if r.significant {
            s.significant_count += 1;
        }

        s.total_system_kg += r.system_quantity_kg;
        s.total_physical_kg += r.physical_quantity_kg;
        s.total_delta_kg += r.delta_kg;
        s.total_value_delta += r.value_delta;
    }

    s
}
