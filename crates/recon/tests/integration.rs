use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use stockcheck_recon::config::{AuditConfig, UnlistedPolicy};
use stockcheck_recon::engine::run;
use stockcheck_recon::model::{ReconResult, VarianceStatus};
use stockcheck_recon::{Cell, Diagnostic, Grid};

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Ledger export: header + (code, name, unit, group, stock kg, cost/kg).
fn ledger_grid(rows: &[(&str, &str, f64, f64)]) -> Grid {
    let mut grid = vec![["Código", "Produto", "Un", "Grupo", "Estoque", "Custo"]
        .into_iter()
        .map(Cell::from)
        .collect::<Vec<_>>()];
    for (code, name, kg, cost) in rows {
        grid.push(vec![
            Cell::from(*code),
            Cell::from(*name),
            Cell::from("KG"),
            Cell::from("Bovinos"),
            Cell::Float(*kg),
            Cell::Float(*cost),
        ]);
    }
    Grid::new(grid)
}

/// Count sheet: title, code row, name row, then one row per weighing.
fn count_grid(columns: &[(&str, &str, Vec<Cell>)]) -> Grid {
    let depth = columns.iter().map(|(_, _, e)| e.len()).max().unwrap_or(0);
    let mut rows = vec![
        vec![Cell::from("Contagem de câmara fria")],
        columns.iter().map(|(code, _, _)| Cell::from(*code)).collect(),
        columns.iter().map(|(_, name, _)| Cell::from(*name)).collect(),
    ];
    for i in 0..depth {
        rows.push(
            columns
                .iter()
                .map(|(_, _, entries)| entries.get(i).cloned().unwrap_or_default())
                .collect(),
        );
    }
    Grid::new(rows)
}

fn audit(ledger: &Grid, count: &Grid) -> ReconResult {
    run(&AuditConfig::default(), ledger, count, run_date()).unwrap()
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn single_product_end_to_end() {
    let ledger = ledger_grid(&[("P1", "Picanha", 10.0, 30.0)]);
    let count = count_grid(&[("P1", "Picanha", vec![Cell::Float(4.0), Cell::Float(5.0)])]);

    let result = audit(&ledger, &count);

    assert_eq!(result.records.len(), 1);
    let r = &result.records[0];
    assert_eq!(r.code, "P1");
    assert_eq!(r.system_quantity_kg, 10.0);
    assert_eq!(r.physical_quantity_kg, 9.0);
    assert_eq!(r.counted_pieces, 2);
    assert_eq!(r.delta_kg, -1.0);
    assert_eq!(r.value_delta, -30.0);
    assert_eq!(r.date, "19/10/2026");
    assert_eq!(result.meta.run_date, run_date());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn empty_count_sheet_means_everything_short() {
    let ledger = ledger_grid(&[
        ("P1", "Picanha Bovina", 10.0, 30.0),
        ("F1", "Filé Mignon Suíno", 3.5, 45.0),
    ]);
    let count = count_grid(&[("P1", "Picanha", vec![])]);
    assert_eq!(count.height(), 3);

    let result = audit(&ledger, &count);

    assert_eq!(result.records.len(), 2);
    for r in &result.records {
        assert_eq!(r.status, VarianceStatus::Uncounted);
        assert_eq!(r.physical_quantity_kg, 0.0);
        assert_eq!(r.delta_kg, -r.system_quantity_kg);
    }
    assert_eq!(result.summary.uncounted, 2);
    assert_eq!(result.summary.shortage_kg, 13.5);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::CountGridTooShort { .. })));
}

#[test]
fn category_filter_end_to_end() {
    let ledger = ledger_grid(&[
        ("C1", "Cordão de Picanha", 2.0, 20.0),
        ("P1", "Picanha Bovina", 10.0, 60.0),
        ("F1", "Filé Mignon Suíno", 4.0, 35.0),
        ("A1", "Alcatra", 9.0, 40.0),
    ]);
    let result = audit(&ledger, &count_grid(&[]));
    let codes: BTreeSet<&str> = result.records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, BTreeSet::from(["F1", "P1"]));
}

#[test]
fn mixed_sheet_summary() {
    let ledger = ledger_grid(&[
        ("P1", "Picanha", 10.0, 60.0),
        ("P2", "Picanha Maturada", 5.0, 90.0),
        ("F1", "Filé Mignon", 8.0, 70.0),
    ]);
    let count = count_grid(&[
        ("P1", "Picanha", vec![Cell::Float(6.0), Cell::Float(6.5)]),
        ("", "", vec![Cell::Float(99.0)]),
        ("F1", "File", vec![Cell::from("4"), Cell::from("4"), Cell::from("x")]),
        ("Z9", "Picanha importada", vec![Cell::Float(1.25)]),
        ("P2", "Picanha Mat.", vec![Cell::Float(0.0), Cell::Float(-3.0)]),
    ]);

    let mut result = audit(&ledger, &count);
    stockcheck_recon::sort_by_deviation(&mut result.records);

    let codes: Vec<&str> = result.records.iter().map(|r| r.code.as_str()).collect();
    // P2 -5, P1 +2.5, Z9 +1.25, F1 0
    assert_eq!(codes, vec!["P2", "P1", "Z9", "F1"]);

    let s = &result.summary;
    assert_eq!(s.total_products, 4);
    assert_eq!(s.matched, 2);
    assert_eq!(s.uncounted, 1);
    assert_eq!(s.unlisted, 1);
    assert_eq!(s.exact_count, 1);
    assert_eq!(s.significant_count, 3);
    assert_eq!(s.surplus_kg, 3.75);
    assert_eq!(s.shortage_kg, 5.0);
    assert_eq!(s.total_value_delta, 2.5 * 60.0 - 5.0 * 90.0);

    let z9 = result.records.iter().find(|r| r.code == "Z9").unwrap();
    assert_eq!(z9.status, VarianceStatus::Unlisted);
    assert_eq!(z9.value_delta, 0.0);
}

#[test]
fn legacy_drop_policy_hides_unlisted_counts() {
    let mut config = AuditConfig::default();
    config.policy.unlisted_counts = UnlistedPolicy::Drop;
    let ledger = ledger_grid(&[("P1", "Picanha", 1.0, 1.0)]);
    let count = count_grid(&[("Z9", "Picanha importada", vec![Cell::Float(1.25)])]);

    let result = run(&config, &ledger, &count, run_date()).unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].code, "P1");
    assert!(result.diagnostics.iter().any(
        |d| matches!(d, Diagnostic::UnlistedCount { code, dropped: true, .. } if code == "Z9")
    ));
}

#[test]
fn header_mapped_ledger_columns() {
    let config = AuditConfig::from_toml(
        r#"
[ledger.columns]
code = "Código"
name = "Produto"
quantity = "Estoque"
cost = "Custo"
"#,
    )
    .unwrap();
    // Same columns, shuffled
    let ledger = Grid::new(vec![
        vec![Cell::from("Custo"), Cell::from("Estoque"), Cell::from("Produto"), Cell::from("Código")],
        vec![Cell::Float(50.0), Cell::Float(2.0), Cell::from("Picanha"), Cell::from("P1")],
    ]);
    let count = count_grid(&[("P1", "Picanha", vec![Cell::Float(2.0)])]);

    let result = run(&config, &ledger, &count, run_date()).unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].unit_cost_per_kg, 50.0);
    assert_eq!(result.records[0].delta_kg, 0.0);
}

#[test]
fn result_serializes_to_json() {
    let ledger = ledger_grid(&[("P1", "Picanha", 10.0, 30.0)]);
    let count = count_grid(&[("P1", "Picanha", vec![Cell::Float(9.0)])]);
    let result = audit(&ledger, &count);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["records"][0]["status"], "matched");
    assert_eq!(json["records"][0]["delta_kg"], -1.0);
    assert_eq!(json["meta"]["run_date"], "2026-10-19");
    assert_eq!(json["summary"]["total_products"], 1);
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

const NAMES: [&str; 4] = ["Picanha Bovina", "Filé Mignon", "Cordão de Picanha", "Alcatra"];

fn ledger_rows() -> impl Strategy<Value = Vec<(u8, usize, f64, f64)>> {
    prop::collection::vec((0u8..8, 0usize..NAMES.len(), -5.0f64..50.0, 0.0f64..120.0), 0..10)
}

fn count_columns() -> impl Strategy<Value = Vec<(u8, Vec<f64>)>> {
    prop::collection::vec((0u8..8, prop::collection::vec(-3.0f64..10.0, 0..6)), 0..8)
}

proptest! {
    #[test]
    fn codes_are_the_union_of_both_sources(ledger in ledger_rows(), columns in count_columns()) {
        let ledger_codes: Vec<String> = ledger.iter().map(|(c, _, _, _)| format!("P{c}")).collect();
        let ledger_input: Vec<(&str, &str, f64, f64)> = ledger
            .iter()
            .zip(&ledger_codes)
            .map(|((_, n, kg, cost), code)| (code.as_str(), NAMES[*n], *kg, *cost))
            .collect();

        let count_codes: Vec<String> = columns.iter().map(|(c, _)| format!("P{c}")).collect();
        let count_cols: Vec<(&str, &str, Vec<Cell>)> = columns
            .iter()
            .zip(&count_codes)
            .map(|((_, entries), code)| {
                (code.as_str(), "Contado", entries.iter().map(|e| Cell::Float(*e)).collect())
            })
            .collect();

        let result = audit(&ledger_grid(&ledger_input), &count_grid(&count_cols));

        let expected_ledger: BTreeSet<String> = ledger
            .iter()
            .zip(&ledger_codes)
            .filter(|((_, n, _, _), _)| *n < 2)
            .map(|(_, code)| code.clone())
            .collect();
        let expected_counted: BTreeSet<String> = columns
            .iter()
            .zip(&count_codes)
            .filter(|((_, entries), _)| entries.iter().any(|e| *e > 0.0))
            .map(|(_, code)| code.clone())
            .collect();
        let expected: BTreeSet<String> = expected_ledger.union(&expected_counted).cloned().collect();

        let got: Vec<String> = result.records.iter().map(|r| r.code.clone()).collect();
        let got_set: BTreeSet<String> = got.iter().cloned().collect();

        prop_assert_eq!(got.len(), got_set.len(), "duplicate codes in output");
        prop_assert_eq!(got_set, expected);

        for r in &result.records {
            prop_assert_eq!(r.delta_kg, r.physical_quantity_kg - r.system_quantity_kg);
            prop_assert_eq!(r.value_delta, r.delta_kg * r.unit_cost_per_kg);
            if r.status == VarianceStatus::Uncounted {
                prop_assert_eq!(r.physical_quantity_kg, 0.0);
                prop_assert_eq!(r.delta_kg, -r.system_quantity_kg);
            }
        }
    }
}
