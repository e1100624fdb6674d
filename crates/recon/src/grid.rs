//! Raw tabular data as handed over by the ingestion layer.
//!
//! No type interpretation happens here beyond what the spreadsheet reader
//! already produced. Extractors decide how to read a cell: as display text
//! (codes, names) or as a number (weights, costs).

use std::fmt;

/// A single raw cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell, as used for product codes and names.
    ///
    /// Integral floats render without decimals so a code typed as `1001` in
    /// one workbook and stored as `1001.0` in another still match.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::String(s) => s.clone(),
            Cell::Float(n) => format_float(*n),
            Cell::Int(n) => n.to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Numeric value of the cell, or `None` when it does not hold a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Float(n) if n.is_finite() => Some(*n),
            Cell::Float(_) => None,
            Cell::Int(n) => Some(*n as f64),
            Cell::String(s) => parse_number(s),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::String(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Float(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Parse the leading decimal number out of free text.
///
/// Reads the longest numeric prefix after trimming, so `"1.5 kg"` is 1.5 and
/// `"3kg"` is 3. A single decimal comma is accepted when the text has no `.`
/// (`"2,5"` is 2.5). Text without leading digits and non-finite results are
/// rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    let comma_is_decimal = !t.contains('.') && t.matches(',').count() == 1;
    let bytes = t.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if let Some(&sep) = bytes.get(end) {
        if sep == b'.' || (sep == b',' && comma_is_decimal) {
            frac_digits = count_digits(&bytes[end + 1..]);
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    t[..end]
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Rows x columns of raw cells. Rows may have different widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> &[Cell] {
        self.rows.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell at (row, col); out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

impl From<Vec<Vec<Cell>>> for Grid {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_of_integral_float_has_no_decimals() {
        assert_eq!(Cell::Float(1001.0).as_text(), "1001");
        assert_eq!(Cell::Float(2.5).as_text(), "2.5");
        assert_eq!(Cell::Int(-7).as_text(), "-7");
        assert_eq!(Cell::Bool(true).as_text(), "TRUE");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(parse_number(" 3.25 "), Some(3.25));
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number("-1"), Some(-1.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        // thousands separators are not guessed at; the prefix stops at the comma
        assert_eq!(parse_number("1,234.5"), Some(1.0));
    }

    #[test]
    fn numbers_from_text_with_trailing_units() {
        assert_eq!(parse_number("1.5 kg"), Some(1.5));
        assert_eq!(parse_number("3kg"), Some(3.0));
        assert_eq!(parse_number(" 12,5 kg"), Some(12.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("7."), Some(7.0));
        assert_eq!(parse_number("2e3 g"), Some(2000.0));
        assert_eq!(parse_number("4e"), Some(4.0));
        assert_eq!(parse_number("-0.25x"), Some(-0.25));
        assert_eq!(parse_number("kg 3"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(Cell::from("2.25 kg").as_number(), Some(2.25));
    }

    #[test]
    fn bool_and_empty_are_not_numbers() {
        assert_eq!(Cell::Bool(true).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Float(f64::NAN).as_number(), None);
        assert_eq!(Cell::Int(4).as_number(), Some(4.0));
    }

    #[test]
    fn out_of_range_cells_are_empty() {
        let grid = Grid::new(vec![vec![Cell::from("a")], vec![]]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.cell(0, 0), &Cell::from("a"));
        assert_eq!(grid.cell(0, 5), &Cell::Empty);
        assert_eq!(grid.cell(9, 0), &Cell::Empty);
        assert!(grid.row(9).is_empty());
    }
}
