//! CSV export of variance records.

use std::io::Write;

use stockcheck_recon::VarianceRecord;

pub const RECORDS_HEADER: &[&str] = &[
    "date",
    "code",
    "product_name",
    "system_quantity_kg",
    "physical_quantity_kg",
    "counted_pieces",
    "delta_kg",
    "unit_cost_per_kg",
    "value_delta",
    "status",
    "significant",
];

fn format_decimal(x: f64) -> String {
    let s = format!("{x:.3}");
    if s == "-0.000" {
        "0.000".into()
    } else {
        s
    }
}

/// Write records in the order given, `\n` line endings.
pub fn write_records_csv(records: &[VarianceRecord], writer: impl Write) -> Result<(), String> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(RECORDS_HEADER)
        .map_err(|e| format!("CSV write error: {e}"))?;

    for r in records {
        csv.write_record(&[
            r.date.as_str(),
            r.code.as_str(),
            r.product_name.as_str(),
            &format_decimal(r.system_quantity_kg),
            &format_decimal(r.physical_quantity_kg),
            &r.counted_pieces.to_string(),
            &format_decimal(r.delta_kg),
            &format_decimal(r.unit_cost_per_kg),
            &format_decimal(r.value_delta),
            &r.status.to_string(),
            if r.significant { "true" } else { "false" },
        ])
        .map_err(|e| format!("CSV write error: {e}"))?;
    }

    csv.flush().map_err(|e| format!("CSV flush error: {e}"))?;
    Ok(())
}
