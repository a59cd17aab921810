//! A1-style cell addressing

use crate::error::{Form2ListError, Form2ListResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static CELL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("static cell address pattern")
});

/// Convert a 1-based column number to column letters
///
/// Examples:
/// - 1 → A
/// - 26 → Z
/// - 27 → AA
/// - 703 → AAA
///
/// Column 0 does not exist; it yields an empty string.
pub fn column_number_to_name(column: u32) -> String {
    let mut result = String::new();
    let mut n = column;

    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    result
}

/// Convert column letters back to a 1-based column number (case-insensitive)
///
/// Returns `None` for an empty name or any non-letter character.
pub fn column_name_to_number(name: &str) -> Option<u32> {
    if name.is_empty() {
        return None;
    }

    let mut number: u32 = 0;
    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        number = number.checked_mul(26)?.checked_add(digit)?;
    }

    Some(number)
}

/// Compose column letters and a row number into a cell address (`B` + 2 → `B2`)
pub fn cell_address(column: &str, row: u32) -> String {
    format!("{}{}", column, row)
}

/// A parsed cell reference with 1-based row and column numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub column: u32,
}

impl CellRef {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Parse an A1-style address; `$` anchors are accepted and ignored
    pub fn parse(address: &str) -> Form2ListResult<Self> {
        let invalid = || Form2ListError::InvalidCellAddress(address.to_string());

        let caps = CELL_PATTERN.captures(address.trim()).ok_or_else(invalid)?;
        let column = column_name_to_number(&caps[1]).ok_or_else(invalid)?;
        let row: u32 = caps[2].parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { row, column })
    }

    /// Zero-based (row, column) position, the convention of calamine and rust_xlsxwriter
    pub fn zero_based(&self) -> (u32, u32) {
        (self.row - 1, self.column - 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            cell_address(&column_number_to_name(self.column), self.row)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_number_to_name() {
        assert_eq!(column_number_to_name(1), "A");
        assert_eq!(column_number_to_name(2), "B");
        assert_eq!(column_number_to_name(26), "Z");
        assert_eq!(column_number_to_name(27), "AA");
        assert_eq!(column_number_to_name(52), "AZ");
        assert_eq!(column_number_to_name(53), "BA");
        assert_eq!(column_number_to_name(702), "ZZ");
        assert_eq!(column_number_to_name(703), "AAA");
    }

    #[test]
    fn test_column_zero_is_empty() {
        assert_eq!(column_number_to_name(0), "");
    }

    #[test]
    fn test_column_name_to_number() {
        assert_eq!(column_name_to_number("A"), Some(1));
        assert_eq!(column_name_to_number("z"), Some(26));
        assert_eq!(column_name_to_number("AA"), Some(27));
        assert_eq!(column_name_to_number("XFD"), Some(16384));
        assert_eq!(column_name_to_number(""), None);
        assert_eq!(column_name_to_number("A1"), None);
    }

    #[test]
    fn test_column_name_round_trip() {
        for n in 1..=20_000 {
            assert_eq!(column_name_to_number(&column_number_to_name(n)), Some(n));
        }
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(CellRef::parse("B2").unwrap(), CellRef::new(2, 2));
        assert_eq!(CellRef::parse("$AA$10").unwrap(), CellRef::new(10, 27));
        assert_eq!(CellRef::parse(" c3 ").unwrap(), CellRef::new(3, 3));
        assert_eq!(CellRef::parse("B2").unwrap().zero_based(), (1, 1));
        assert_eq!(CellRef::new(11, 28).to_string(), "AB11");
    }

    #[test]
    fn test_parse_cell_ref_rejects_garbage() {
        for bad in ["", "2B", "A0", "B", "12", "Sheet1!A1", "A-1"] {
            assert!(
                matches!(CellRef::parse(bad), Err(Form2ListError::InvalidCellAddress(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
