//! FITS header record (card) parsing.
//!
//! Parsing never fails: malformed rows degrade to text values so that quirky
//! producers still yield a usable header.

use alloc::string::String;

use crate::block::CARD_SIZE;
use crate::value::{parse_value, split_value_comment, Value};

/// Keyword whose text extends the value of the preceding record.
pub const CONTINUE_KEYWORD: &str = "CONTINUE";

/// Keyword of the row that terminates the header.
pub const END_KEYWORD: &str = "END";

/// One parsed 80-byte header row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    /// Keyword from bytes 0..8, trimmed.
    pub key: String,
    /// Typed value; free-text rows carry their text here as well.
    pub value: Value,
    /// Comment text after the `/`, or the free text for commentary rows.
    pub comment: String,
}

impl HeaderRecord {
    /// Create a record from its parts.
    pub fn new(key: &str, value: Value, comment: &str) -> Self {
        HeaderRecord {
            key: String::from(key),
            value,
            comment: String::from(comment),
        }
    }

    /// Returns `true` for `CONTINUE` records.
    pub fn is_continue(&self) -> bool {
        self.key == CONTINUE_KEYWORD
    }

    /// Returns `true` for COMMENT, HISTORY, or keyword-less records.
    pub fn is_commentary(&self) -> bool {
        matches!(self.key.as_str(), "COMMENT" | "HISTORY" | "")
    }
}

/// Map bytes one-to-one onto characters so byte and character columns agree.
pub(crate) fn row_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Returns `true` if every byte of the row is an ASCII space.
pub fn is_blank_row(row: &[u8]) -> bool {
    row.iter().all(|&b| b == b' ')
}

/// Returns `true` if the row is `END` surrounded only by ASCII whitespace.
pub fn is_end_row(row: &[u8]) -> bool {
    row.trim_ascii() == END_KEYWORD.as_bytes()
}

/// Parse one header row into a [`HeaderRecord`].
///
/// Rows shorter than [`CARD_SIZE`] are treated as padded with spaces; bytes
/// past [`CARD_SIZE`] are ignored.
pub fn parse_record(row: &[u8]) -> HeaderRecord {
    let mut card = [b' '; CARD_SIZE];
    let len = row.len().min(CARD_SIZE);
    card[..len].copy_from_slice(&row[..len]);

    let key = row_text(&card[..8]);
    let key = key.trim();

    if &card[8..10] != b"= " {
        let text = row_text(&card[8..]);
        let text = text.trim();
        return HeaderRecord::new(key, Value::Text(String::from(text)), text);
    }

    let field = row_text(&card[10..]);
    let (value_part, comment) = split_value_comment(&field);
    HeaderRecord::new(
        key,
        parse_value(value_part),
        comment.map(str::trim).unwrap_or(""),
    )
}
