use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Audit configuration. Every field has a default, so an empty TOML document
/// reproduces the stock picanha / filé mignon audit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    pub name: String,
    pub ledger: LedgerLayout,
    pub count: CountLayout,
    pub category: CategoryFilter,
    pub policy: PolicyConfig,
    pub report: ReportConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            name: "Picanha & Filé Mignon".into(),
            ledger: LedgerLayout::default(),
            count: CountLayout::default(),
            category: CategoryFilter::default(),
            policy: PolicyConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger layout
// ---------------------------------------------------------------------------

/// Row-per-product ledger export.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerLayout {
    /// Leading rows to skip. Header names are resolved against the first one.
    pub header_rows: usize,
    pub columns: LedgerColumns,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            columns: LedgerColumns::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerColumns {
    pub code: ColumnRef,
    pub name: ColumnRef,
    pub quantity: ColumnRef,
    pub cost: ColumnRef,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            code: ColumnRef::Index(0),
            name: ColumnRef::Index(1),
            quantity: ColumnRef::Index(4),
            cost: ColumnRef::Index(5),
        }
    }
}

/// A ledger column, either by zero-based position or by header text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Header(String),
}

// ---------------------------------------------------------------------------
// Count layout
// ---------------------------------------------------------------------------

/// Column-per-product count sheet: one row of codes, one row of names, then
/// one row per weighing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CountLayout {
    pub code_row: usize,
    pub name_row: usize,
    pub first_data_row: usize,
}

impl Default for CountLayout {
    fn default() -> Self {
        Self {
            code_row: 1,
            name_row: 2,
            first_data_row: 3,
        }
    }
}

impl CountLayout {
    /// Fewer rows than this means the sheet holds no entries at all.
    pub fn min_rows(&self) -> usize {
        self.first_data_row + 1
    }
}

// ---------------------------------------------------------------------------
// Category filter
// ---------------------------------------------------------------------------

/// Substring filter on ledger product names (case-insensitive).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            include: vec!["picanha".into(), "filé mignon".into(), "file mignon".into()],
            exclude: vec!["cordão".into()],
        }
    }
}

impl CategoryFilter {
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        let hit = |term: &String| name.contains(&term.to_lowercase());
        self.include.iter().any(hit) && !self.exclude.iter().any(hit)
    }
}

// ---------------------------------------------------------------------------
// Policies + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub unlisted_counts: UnlistedPolicy,
    pub duplicate_codes: DuplicatePolicy,
}

/// What to do with a counted product that has no ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlistedPolicy {
    /// Emit a surplus record with zero unit cost.
    #[default]
    Report,
    /// Leave it out of the records (a diagnostic still names it).
    Drop,
}

/// What to do when a product code appears on several ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later rows overwrite earlier ones.
    #[default]
    LastWins,
    /// Fail the run.
    Reject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Deltas strictly larger than this (in kg, absolute) are flagged.
    pub significant_delta_kg: f64,
    /// chrono strftime pattern for the record date stamp.
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            significant_delta_kg: 1.0,
            date_format: "%d/%m/%Y".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let count = &self.count;
        if count.code_row == count.name_row {
            return Err(ReconError::ConfigValidation(format!(
                "count.code_row and count.name_row must differ (both {})",
                count.code_row
            )));
        }
        if count.code_row >= count.first_data_row || count.name_row >= count.first_data_row {
            return Err(ReconError::ConfigValidation(format!(
                "count.first_data_row ({}) must come after code_row ({}) and name_row ({})",
                count.first_data_row, count.code_row, count.name_row
            )));
        }

        let has_header_refs = [
            &self.ledger.columns.code,
            &self.ledger.columns.name,
            &self.ledger.columns.quantity,
            &self.ledger.columns.cost,
        ]
        .iter()
        .any(|c| matches!(c, ColumnRef::Header(_)));
        if has_header_refs && self.ledger.header_rows == 0 {
            return Err(ReconError::ConfigValidation(
                "ledger columns mapped by header name require header_rows >= 1".into(),
            ));
        }

        if self.category.include.iter().all(|t| t.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(
                "category.include needs at least one non-empty term".into(),
            ));
        }

        let threshold = self.report.significant_delta_kg;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "report.significant_delta_kg must be a finite number >= 0, got {threshold}"
            )));
        }

        let date_format = &self.report.date_format;
        if date_format.is_empty() || !renders_as_date(date_format) {
            return Err(ReconError::ConfigValidation(format!(
                "report.date_format is not a valid strftime pattern: \"{date_format}\""
            )));
        }

        Ok(())
    }
}

/// Whether a strftime pattern can be rendered from a bare date. Time and
/// offset fields (`%H`, `%z`, ...) fail at format time, not at parse time.
fn renders_as_date(pattern: &str) -> bool {
    use std::fmt::Write;

    let items = chrono::format::StrftimeItems::new(pattern);
    if items.clone().any(|item| matches!(item, chrono::format::Item::Error)) {
        return false;
    }
    let sample = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let mut out = String::new();
    write!(out, "{}", sample.format_with_items(items)).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = AuditConfig::from_toml("").unwrap();
        assert_eq!(config.ledger.header_rows, 1);
        assert_eq!(config.ledger.columns.code, ColumnRef::Index(0));
        assert_eq!(config.ledger.columns.cost, ColumnRef::Index(5));
        assert_eq!(config.count.first_data_row, 3);
        assert_eq!(config.policy.unlisted_counts, UnlistedPolicy::Report);
        assert_eq!(config.policy.duplicate_codes, DuplicatePolicy::LastWins);
        assert_eq!(config.report.significant_delta_kg, 1.0);
    }

    #[test]
    fn parse_header_columns_and_policies() {
        let input = r#"
name = "Loja 3"

[ledger.columns]
code = "Código"
name = "Descrição"
quantity = 4
cost = "Custo"

[policy]
unlisted_counts = "drop"
duplicate_codes = "reject"

[report]
significant_delta_kg = 0.5
"#;
        let config = AuditConfig::from_toml(input).unwrap();
        assert_eq!(config.name, "Loja 3");
        assert_eq!(config.ledger.columns.code, ColumnRef::Header("Código".into()));
        assert_eq!(config.ledger.columns.quantity, ColumnRef::Index(4));
        assert_eq!(config.policy.unlisted_counts, UnlistedPolicy::Drop);
        assert_eq!(config.policy.duplicate_codes, DuplicatePolicy::Reject);
        assert_eq!(config.report.significant_delta_kg, 0.5);
        // untouched sections keep their defaults
        assert_eq!(config.count.code_row, 1);
        assert_eq!(config.report.date_format, "%d/%m/%Y");
    }

    #[test]
    fn default_config_survives_toml_roundtrip() {
        let text = AuditConfig::default().to_toml().unwrap();
        let back = AuditConfig::from_toml(&text).unwrap();
        assert_eq!(back.category.include, CategoryFilter::default().include);
        assert_eq!(back.ledger.columns.name, ColumnRef::Index(1));
    }

    #[test]
    fn reject_unknown_policy_value() {
        let err = AuditConfig::from_toml("[policy]\nunlisted_counts = \"ignore\"\n");
        assert!(matches!(err, Err(ReconError::ConfigParse(_))));
    }

    #[test]
    fn reject_data_row_before_name_row() {
        let input = "[count]\ncode_row = 0\nname_row = 3\nfirst_data_row = 2\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("first_data_row"));
    }

    #[test]
    fn reject_same_code_and_name_row() {
        let input = "[count]\ncode_row = 1\nname_row = 1\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn reject_header_names_without_header_row() {
        let input = "[ledger]\nheader_rows = 0\n[ledger.columns]\ncode = \"Código\"\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("header_rows"));
    }

    #[test]
    fn reject_empty_category() {
        let input = "[category]\ninclude = [\"  \"]\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("category.include"));
    }

    #[test]
    fn reject_negative_threshold() {
        let input = "[report]\nsignificant_delta_kg = -1.0\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("significant_delta_kg"));
    }

    #[test]
    fn reject_bad_date_format() {
        let input = "[report]\ndate_format = \"%Q\"\n";
        let err = AuditConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("date_format"));
    }

    #[test]
    fn reject_date_format_with_time_fields() {
        for pattern in ["%d/%m/%Y %H:%M", "%Y-%m-%dT%H:%M:%S%z", "%s"] {
            let input = format!("[report]\ndate_format = \"{pattern}\"\n");
            let err = AuditConfig::from_toml(&input).unwrap_err();
            assert!(matches!(err, ReconError::ConfigValidation(_)), "{pattern}");
        }
        // date-only fields and literals are fine
        let config = AuditConfig::from_toml("[report]\ndate_format = \"%A, %d de %B de %Y\"\n").unwrap();
        assert_eq!(config.report.date_format, "%A, %d de %B de %Y");
    }

    #[test]
    fn category_filter_defaults() {
        let filter = CategoryFilter::default();
        assert!(filter.matches("Picanha Bovina"));
        assert!(filter.matches("  FILÉ MIGNON Suíno "));
        assert!(filter.matches("file mignon s/ cordao"));
        assert!(!filter.matches("Cordão de Picanha"));
        assert!(!filter.matches("Alcatra"));
        assert!(!filter.matches(""));
    }
}
