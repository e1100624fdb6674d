use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad row layout, empty category, etc.).
    ConfigValidation(String),
    /// A ledger column mapped by header name is not present in the header row.
    MissingColumn { field: &'static str, header: String },
    /// Same product code on more than one ledger row under the `reject` policy.
    DuplicateCode { code: String, rows: Vec<usize> },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { field, header } => {
                write!(f, "ledger column '{field}': header '{header}' not found")
            }
            Self::DuplicateCode { code, rows } => {
                let rows: Vec<String> = rows.iter().map(|r| (r + 1).to_string()).collect();
                write!(f, "duplicate ledger code '{code}' on rows {}", rows.join(", "))
            }
        }
    }
}

impl std::error::Error for ReconError {}
