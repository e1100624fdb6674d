//! Plain-text audit report.

use std::fmt::Write;

use stockcheck_recon::{ReconResult, VarianceRecord, VarianceStatus};

/// Two-decimal rendering with an explicit `+` on positives. Values that
/// round to zero print as `0.00`, never `-0.00`.
pub fn signed(x: f64) -> String {
    let rounded = (x * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0.00".to_string()
    } else if rounded > 0.0 {
        format!("+{rounded:.2}")
    } else {
        format!("{rounded:.2}")
    }
}

fn status_tag(r: &VarianceRecord) -> &'static str {
    match r.status {
        VarianceStatus::Matched => "",
        VarianceStatus::Uncounted => " [not counted]",
        VarianceStatus::Unlisted => " [not in ledger]",
    }
}

/// Render the report. Records are printed in the order given; callers sort
/// them by deviation first.
pub fn render_text(result: &ReconResult, threshold_kg: f64) -> String {
    let s = &result.summary;
    let date = result
        .records
        .first()
        .map(|r| r.date.clone())
        .unwrap_or_else(|| result.meta.run_date.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Inventory report - {}", result.meta.config_name);
    let _ = writeln!(out, "Date: {date}");
    let _ = writeln!(out);

    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "  Products:        {}", s.total_products);
    let _ = writeln!(out, "  System total:    {:.2} kg", s.total_system_kg);
    let _ = writeln!(out, "  Physical total:  {:.2} kg", s.total_physical_kg);
    let _ = writeln!(out, "  Total delta:     {} kg", signed(s.total_delta_kg));
    let _ = writeln!(out, "  Surplus:         {:.2} kg ({} product(s))", s.surplus_kg, s.surplus_count);
    let _ = writeln!(out, "  Shortage:        {:.2} kg ({} product(s))", s.shortage_kg, s.shortage_count);
    let _ = writeln!(out, "  Exact:           {} product(s)", s.exact_count);
    let _ = writeln!(out, "  Value delta:     {}", signed(s.total_value_delta));
    if s.uncounted > 0 || s.unlisted > 0 {
        let _ = writeln!(out, "  Not counted:     {}", s.uncounted);
        let _ = writeln!(out, "  Not in ledger:   {}", s.unlisted);
    }
    let _ = writeln!(out);

    let significant: Vec<&VarianceRecord> = result.records.iter().filter(|r| r.significant).collect();
    if significant.is_empty() {
        let _ = writeln!(out, "All products within tolerance (<= {threshold_kg:.2} kg)");
    } else {
        let _ = writeln!(out, "SIGNIFICANT DEVIATIONS (> {threshold_kg:.2} kg)");
        for r in significant {
            let _ = writeln!(
                out,
                "  * {} ({}): {} kg{}",
                r.product_name,
                r.code,
                signed(r.delta_kg),
                status_tag(r)
            );
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "DETAIL");
    for r in &result.records {
        let _ = writeln!(
            out,
            "  {} ({}): system {:.2} kg | physical {:.2} kg ({} pc) | delta {} kg | value {}{}",
            r.product_name,
            r.code,
            r.system_quantity_kg,
            r.physical_quantity_kg,
            r.counted_pieces,
            signed(r.delta_kg),
            signed(r.value_delta),
            status_tag(r)
        );
    }

    if !result.diagnostics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "NOTES");
        for d in &result.diagnostics {
            let _ = writeln!(out, "  - {d}");
        }
    }

    out
}
