// CSV/TSV import
//
// Every field arrives as text; numeric interpretation is left to the
// extractors, same as for spreadsheet string cells.

use std::path::Path;

use stockcheck_recon::{Cell, Grid};

use crate::error::IngestionError;

pub fn import(path: &Path) -> Result<Grid, IngestionError> {
    let content = read_text(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter).map_err(|e| IngestionError::csv(path, e))
}

pub fn import_tsv(path: &Path) -> Result<Grid, IngestionError> {
    let content = read_text(path)?;
    import_from_string(&content, b'\t').map_err(|e| IngestionError::csv(path, e))
}

/// Ledger and count exports come from spreadsheet "save as CSV": semicolon in
/// pt-BR locales, comma elsewhere, tab for copy-paste dumps. Earlier entries
/// win ties.
const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];

/// Lines inspected when guessing the delimiter. Covers the count sheet's
/// title, code and name rows plus a few weighings.
const SNIFF_LINES: usize = 8;

/// Pick the delimiter that splits the most sampled rows at the sample's
/// widest field count. Falls back to comma for single-column files.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let sample = sample.join("\n");

    let mut best = (b',', 0);
    for delim in DELIMITERS {
        let score = delimiter_score(&sample, delim);
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

fn delimiter_score(sample: &str, delim: u8) -> usize {
    let widths: Vec<usize> = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes())
        .records()
        .map_while(Result::ok)
        .map(|r| r.len())
        .collect();

    match widths.iter().max() {
        Some(&widest) if widest > 1 => widths.iter().filter(|&&w| w == widest).count() * widest,
        _ => 0,
    }
}

/// Read the whole file as text. Non-UTF-8 exports are decoded as
/// Windows-1252, the code page older Excel builds write.
fn read_text(path: &Path) -> Result<String, IngestionError> {
    let bytes = std::fs::read(path).map_err(|e| IngestionError::io(path, e.to_string()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            encoding_rs::WINDOWS_1252.decode(e.as_bytes()).0.into_owned()
        }
    })
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Grid, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(Grid::new(rows))
}
