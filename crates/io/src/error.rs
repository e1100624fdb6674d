use std::fmt;
use std::path::{Path, PathBuf};

/// A file could not be turned into a grid.
#[derive(Debug)]
pub enum IngestionError {
    /// File missing or unreadable.
    Io { path: PathBuf, message: String },
    /// Not a parseable spreadsheet container, or no sheet to read.
    Spreadsheet { path: PathBuf, message: String },
    /// Malformed delimited text.
    Csv { path: PathBuf, message: String },
    /// Extension outside the accepted set.
    UnsupportedFormat { path: PathBuf, extension: String },
}

impl IngestionError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Spreadsheet { path, .. }
            | Self::Csv { path, .. }
            | Self::UnsupportedFormat { path, .. } => path,
        }
    }

    pub(crate) fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io { path: path.to_path_buf(), message: message.into() }
    }

    pub(crate) fn spreadsheet(path: &Path, message: impl Into<String>) -> Self {
        Self::Spreadsheet { path: path.to_path_buf(), message: message.into() }
    }

    pub(crate) fn csv(path: &Path, message: impl Into<String>) -> Self {
        Self::Csv { path: path.to_path_buf(), message: message.into() }
    }
}

impl fmt::Display for IngestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Spreadsheet { path, message } => {
                write!(f, "{} is not a readable spreadsheet: {message}", path.display())
            }
            Self::Csv { path, message } => write!(f, "{}: CSV error: {message}", path.display()),
            Self::UnsupportedFormat { path, extension } => {
                let ext = if extension.is_empty() { "(none)" } else { extension.as_str() };
                write!(
                    f,
                    "{}: unsupported file type {ext} (expected .ods, .xlsx, .xls or .csv)",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for IngestionError {}
