//! Keyword lookup table built from an ordered sequence of header records.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::header::HeaderRecord;
use crate::value::{unquote, Value};

/// Header records keyed by keyword, iterated in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderTable {
    records: Vec<HeaderRecord>,
    index: BTreeMap<String, usize>,
}

impl HeaderTable {
    /// Fold records into a table, merging `CONTINUE` records into the value
    /// of the most recent non-`CONTINUE` record.
    ///
    /// A repeated keyword overwrites the earlier record but keeps its
    /// position. A `CONTINUE` with nothing before it is dropped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = HeaderRecord>,
    {
        let mut table = HeaderTable::default();
        let mut current: Option<usize> = None;

        for record in records {
            if !record.is_continue() {
                current = Some(table.insert(record));
                continue;
            }
            match current {
                Some(slot) => {
                    let target = &mut table.records[slot];
                    let mut text = target.value.to_text();
                    text.push(' ');
                    text.push_str(&continuation_text(&record.value));
                    target.value = Value::Text(text);
                }
                None => log::warn!("discarding CONTINUE record with no preceding keyword"),
            }
        }

        table
    }

    fn insert(&mut self, record: HeaderRecord) -> usize {
        match self.index.get(&record.key) {
            Some(&slot) => {
                self.records[slot] = record;
                slot
            }
            None => {
                let slot = self.records.len();
                self.index.insert(record.key.clone(), slot);
                self.records.push(record);
                slot
            }
        }
    }

    /// Returns the record for `key`.
    pub fn get(&self, key: &str) -> Option<&HeaderRecord> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    /// Returns the value for `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).map(|r| &r.value)
    }

    /// Returns the numeric value for `key`, coercing numeric text.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(Value::as_f64)
    }

    /// Returns the integer value for `key`.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(Value::as_i64)
    }

    /// Returns the logical value for `key`.
    pub fn logical(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(Value::as_bool)
    }

    /// Returns the text value for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `true` if NAXIS is present and non-zero, i.e. a data unit follows.
    pub fn has_data_unit(&self) -> bool {
        matches!(self.integer("NAXIS"), Some(n) if n != 0)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderRecord> {
        self.records.iter()
    }

    /// Iterate over keywords in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key.as_str())
    }
}

impl FromIterator<HeaderRecord> for HeaderTable {
    fn from_iter<I: IntoIterator<Item = HeaderRecord>>(iter: I) -> Self {
        HeaderTable::from_records(iter)
    }
}

/// Text appended by a `CONTINUE` record; a quoted string is unquoted.
fn continuation_text(value: &Value) -> String {
    let text = value.to_text();
    if text.starts_with('\'') {
        unquote(&text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::CARD_SIZE;
    use crate::header::parse_record;
    use alloc::vec;

    fn text(s: &str) -> Value {
        Value::Text(String::from(s))
    }

    fn row(s: &str) -> HeaderRecord {
        let mut buf = [b' '; CARD_SIZE];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        parse_record(&buf)
    }

    #[test]
    fn continue_records_append_to_previous() {
        let records = vec![
            HeaderRecord::new("COMMENT", text("first part"), "first part"),
            HeaderRecord::new("CONTINUE", text("second part"), "second part"),
            HeaderRecord::new("CONTINUE", text("third part"), "third part"),
        ];
        let table = HeaderTable::from_records(records);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.value("COMMENT"),
            Some(&text("first part second part third part"))
        );
        assert!(!table.contains("CONTINUE"));
    }

    #[test]
    fn quoted_continuation_is_unquoted() {
        let table = HeaderTable::from_records(vec![
            row("LONGSTR = 'This is a long'"),
            row("CONTINUE  'string value'"),
        ]);
        assert_eq!(table.text("LONGSTR"), Some("This is a long string value"));
    }

    #[test]
    fn continue_coerces_numbers_to_text() {
        let table = HeaderTable::from_records(vec![
            row("EXPTIME =                   30"),
            row("CONTINUE seconds"),
        ]);
        assert_eq!(table.text("EXPTIME"), Some("30 seconds"));
    }

    #[test]
    fn orphan_continue_is_discarded() {
        let table = HeaderTable::from_records(vec![
            row("CONTINUE  'nothing before'"),
            row("NAXIS   =                    2"),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.integer("NAXIS"), Some(2));
    }

    #[test]
    fn duplicate_key_overwrites_in_place() {
        let table = HeaderTable::from_records(vec![
            row("BITPIX  =                    8"),
            row("NAXIS   =                    2"),
            row("BITPIX  =                   16"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.integer("BITPIX"), Some(16));
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["BITPIX", "NAXIS"]);
    }

    #[test]
    fn continue_after_duplicate_targets_latest_record() {
        let table = HeaderTable::from_records(vec![
            row("OBJECT  = 'M31'"),
            row("OBJECT  = 'M33'"),
            row("CONTINUE  'galaxy'"),
        ]);
        assert_eq!(table.text("OBJECT"), Some("M33 galaxy"));
    }

    #[test]
    fn typed_lookups() {
        let table: HeaderTable = vec![
            row("SIMPLE  =                    T"),
            row("NAXIS   =                    2"),
            row("NAXIS1  = '512'"),
            row("BSCALE  =                  0.5"),
            row("OBJECT  = 'NGC 1234'"),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.logical("SIMPLE"), Some(true));
        assert_eq!(table.integer("NAXIS1"), Some(512));
        assert_eq!(table.number("BSCALE"), Some(0.5));
        assert_eq!(table.integer("BSCALE"), None);
        assert_eq!(table.text("OBJECT"), Some("NGC 1234"));
        assert_eq!(table.get("MISSING"), None);
        assert!(table.has_data_unit());
    }

    #[test]
    fn no_data_unit_when_naxis_zero_or_missing() {
        let table = HeaderTable::from_records(vec![row("NAXIS   =                    0")]);
        assert!(!table.has_data_unit());
        assert!(!HeaderTable::default().has_data_unit());
        assert!(HeaderTable::default().is_empty());
    }
}
