use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Columns that can be named with at most two letters (`A`..`ZZ`).
pub const TWO_LETTER_COLUMNS: usize = 26 * 27;

/// Columns whose leading letter stays below the surrogate block. Below this
/// bound `cell_name` is injective and `parse_cell_name` inverts it.
pub const NAMED_COLUMNS: usize = (0xD800 - b'A' as usize + 1) * 26;

// The tier is any single scalar value; `parse_cell_name` range-checks it.
static CELL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<tier>(?s:.))?(?P<unit>[A-Z])(?P<row>[1-9][0-9]*)$").unwrap());

/// Zero-based grid cell. Rows grow downward, columns grow rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn name(&self) -> String {
        cell_name(self.row, self.col)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Spreadsheet-style label for a cell: `A1`, `Z1`, `AA1`, ...
///
/// Columns past `ZZ` keep the two-letter shape and the leading letter walks on
/// past `Z` through the following code points (`[A1`, `\A1`, ...). The scheme
/// never grows a third letter. Tiers that would land in the surrogate block
/// come out as U+FFFD, so names are only unique below [`NAMED_COLUMNS`].
pub fn cell_name(row: usize, col: usize) -> String {
    let number = row as u128 + 1;
    if col < ALPHABET.len() {
        return format!("{}{}", ALPHABET[col] as char, number);
    }
    let tier = tier_letter(col / ALPHABET.len() - 1);
    let unit = ALPHABET[col % ALPHABET.len()] as char;
    format!("{tier}{unit}{number}")
}

fn tier_letter(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|index| (b'A' as u32).checked_add(index))
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Inverse of [`cell_name`]. Returns `None` for anything `cell_name` never
/// produces (lowercase letters, a zero or zero-padded row, trailing text).
pub fn parse_cell_name(label: &str) -> Option<CellCoord> {
    let caps = CELL_NAME_RE.captures(label)?;
    let unit = caps.name("unit")?.as_str().as_bytes()[0] - b'A';
    let row: usize = caps.name("row")?.as_str().parse().ok()?;
    let col = match caps.name("tier") {
        None => unit as usize,
        Some(tier) => {
            let tier = tier.as_str().chars().next()?;
            if tier == char::REPLACEMENT_CHARACTER {
                return None;
            }
            let index = (tier as u32).checked_sub(b'A' as u32)? as usize;
            (index + 1)
                .checked_mul(ALPHABET.len())?
                .checked_add(unit as usize)?
        }
    };
    Some(CellCoord::new(row - 1, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn single_letter_columns() {
        assert_eq!(cell_name(0, 0), "A1");
        assert_eq!(cell_name(25, 0), "A26");
        assert_eq!(cell_name(0, 25), "Z1");
        for col in 0..26 {
            for row in [0usize, 1, 9, 99, 12345] {
                let expected = format!("{}{}", (b'A' + col as u8) as char, row + 1);
                assert_eq!(cell_name(row, col), expected);
            }
        }
    }

    #[test]
    fn two_letter_columns() {
        assert_eq!(cell_name(0, 26), "AA1");
        assert_eq!(cell_name(0, 27), "AB1");
        assert_eq!(cell_name(4, 51), "AZ5");
        assert_eq!(cell_name(0, 52), "BA1");
        assert_eq!(cell_name(0, TWO_LETTER_COLUMNS - 1), "ZZ1");
        for col in 26..TWO_LETTER_COLUMNS {
            let name = cell_name(41, col);
            assert_eq!(name.len(), 2 + "42".len(), "{name}");
            assert!(name.chars().take(2).all(|ch| ch.is_ascii_uppercase()), "{name}");
        }
    }

    #[test]
    fn tier_letter_continues_past_z() {
        assert_eq!(cell_name(0, TWO_LETTER_COLUMNS), "[A1");
        assert_eq!(cell_name(2, TWO_LETTER_COLUMNS + 27), "\\B3");
    }

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for row in 0..40 {
            for col in 0..TWO_LETTER_COLUMNS {
                assert!(seen.insert(cell_name(row, col)), "duplicate for ({row}, {col})");
            }
        }
    }

    #[test]
    fn parse_inverts_cell_name() {
        for (row, col) in [(0, 0), (25, 0), (0, 25), (0, 26), (9, 701), (3, 702), (999, 999)] {
            let name = cell_name(row, col);
            assert_eq!(parse_cell_name(&name), Some(CellCoord::new(row, col)), "{name}");
        }
    }

    #[test]
    fn parse_inverts_digit_like_tiers() {
        // U+0663 ARABIC-INDIC DIGIT THREE as the leading letter.
        let col = (0x663 - b'A' as usize + 1) * 26 + 4;
        let name = cell_name(6, col);
        assert!(name.starts_with('\u{663}'), "{name}");
        assert_eq!(parse_cell_name(&name), Some(CellCoord::new(6, col)));
        assert_eq!(
            parse_cell_name(&cell_name(0, NAMED_COLUMNS - 1)),
            Some(CellCoord::new(0, NAMED_COLUMNS - 1))
        );
    }

    #[test]
    fn surrogate_tiers_do_not_parse() {
        let name = cell_name(0, NAMED_COLUMNS);
        assert!(name.starts_with(char::REPLACEMENT_CHARACTER), "{name}");
        assert_eq!(parse_cell_name(&name), None);
    }

    #[test]
    fn parse_rejects_foreign_text() {
        for label in ["", "A", "1", "A0", "A01", "a1", "AAA1", "A1x", "1A", "AA"] {
            assert_eq!(parse_cell_name(label), None, "{label:?}");
        }
    }
}
