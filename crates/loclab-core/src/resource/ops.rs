//! Pure in-memory operations on a parsed document

use super::{Document, Record};
use serde::Serialize;

/// Outcome of an upsert against one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Added,
    Updated,
}

/// Exact-match lookup by key.
///
/// Ordinal comparison, case-sensitive. Linear scan is fine here: documents
/// are translation-file sized, not database sized.
pub fn find_by_key<'a>(doc: &'a Document, key: &str) -> Option<&'a Record> {
    doc.records.iter().find(|r| r.key == key)
}

/// Inserts or replaces the value for `key`.
///
/// An existing record keeps its position (the serializer re-sorts on every
/// write anyway); a new record is appended with the preserve-whitespace
/// marker set.
pub fn upsert(doc: &mut Document, key: &str, value: &str) -> UpsertAction {
    let normalized = normalize_value(value);
    if let Some(record) = doc.records.iter_mut().find(|r| r.key == key) {
        record.value = normalized;
        UpsertAction::Updated
    } else {
        doc.records.push(Record {
            key: key.to_string(),
            value: normalized,
            preserve_space: true,
        });
        UpsertAction::Added
    }
}

/// Stored values use bare LF regardless of the file's line-ending mode;
/// otherwise a CRLF value written into a CRLF file would grow an extra CR
/// on every round trip.
fn normalize_value(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "")
}
