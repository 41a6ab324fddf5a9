//! Parse and serialize the resource file markup
//!
//! The record-bearing section is the run of `<data>` elements; everything
//! before the first one and after the last one passes through opaque. The
//! parser works on LF-normalized text and tracks the original line-ending
//! mode separately so the serializer can reapply it.

use super::{Document, LineEnding, Record};
use crate::error::{LoclabError, Result};
use std::path::Path;

const DATA_OPEN: &str = "<data";
const DATA_CLOSE: &str = "</data>";
const VALUE_OPEN: &str = "<value>";
const VALUE_CLOSE: &str = "</value>";
const ROOT_CLOSE: &str = "</root>";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Reads and parses the resource file at `path`, reporting its line-ending
/// mode alongside the document.
///
/// A missing file is `DOCUMENT_NOT_FOUND` (distinct from a parse error and
/// recoverable by the caller); any other read failure propagates as I/O.
pub async fn load(path: &Path) -> Result<(Document, LineEnding)> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoclabError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(LoclabError::Io(e)),
    };
    let eol = LineEnding::detect(&raw);
    let doc = parse(&raw, path)?;
    Ok((doc, eol))
}

/// Parses resource markup into a document.
///
/// Accepts either line-ending convention; the returned document is
/// LF-normalized throughout. A file without any `<data>` element parses to
/// an empty record sequence with the insertion point just before `</root>`,
/// so mutation logic can append unconditionally.
///
/// Text found between record elements (hand-written comments, typically)
/// cannot keep its position because every write re-sorts the records; it is
/// folded into the end of the prologue rather than dropped.
pub fn parse(raw: &str, path: &Path) -> Result<Document> {
    let text = raw.replace("\r\n", "\n");

    let mut records = Vec::new();
    let mut interstitial = String::new();
    let mut cursor = 0usize;
    let mut first_start: Option<usize> = None;
    let mut last_end = 0usize;

    while let Some(start) = find_data_open(&text, cursor) {
        let block_start = block_start(&text, start);
        match first_start {
            None => first_start = Some(block_start),
            Some(_) => {
                let gap = &text[last_end..block_start];
                if !gap.trim().is_empty() {
                    interstitial.push_str(gap);
                }
            }
        }

        let tag_end = text[start..]
            .find('>')
            .map(|i| start + i)
            .ok_or_else(|| parse_err(path, "unterminated <data> tag"))?;
        let self_closing = text[..tag_end].ends_with('/');
        let attrs = &text[start + DATA_OPEN.len()..tag_end - usize::from(self_closing)];
        let key = attr_value(attrs, "name")
            .ok_or_else(|| parse_err(path, "<data> element is missing a name attribute"))?;
        let preserve = attr_value(attrs, "xml:space").as_deref() == Some("preserve");

        // A self-closing element is the empty-value degenerate form
        let (value, mut end) = if self_closing {
            (String::new(), tag_end + 1)
        } else {
            let close = text[tag_end..].find(DATA_CLOSE).map(|i| tag_end + i).ok_or_else(|| {
                parse_err(path, &format!("unterminated <data> element for key '{key}'"))
            })?;
            let body = &text[tag_end + 1..close];
            let value = match body.find(VALUE_OPEN) {
                Some(open) => {
                    let vstart = open + VALUE_OPEN.len();
                    let vend = body[vstart..].find(VALUE_CLOSE).map(|i| vstart + i).ok_or_else(
                        || parse_err(path, &format!("unterminated <value> for key '{key}'")),
                    )?;
                    unescape(&body[vstart..vend])
                }
                // <data> without a <value> child carries an empty value
                None => String::new(),
            };
            (value, close + DATA_CLOSE.len())
        };

        records.push(Record {
            key: unescape(&key),
            value,
            preserve_space: preserve,
        });

        if text[end..].starts_with('\n') {
            end += 1;
        }
        last_end = end;
        cursor = end;
    }

    let (prologue, epilogue) = match first_start {
        Some(first) => {
            let mut prologue = text[..first].to_string();
            prologue.push_str(&interstitial);
            (prologue, text[last_end..].to_string())
        }
        None => match text.find(ROOT_CLOSE) {
            Some(at) => {
                let split = block_start(&text, at);
                (text[..split].to_string(), text[split..].to_string())
            }
            None => (text, String::new()),
        },
    };

    Ok(Document {
        prologue,
        records,
        epilogue,
    })
}

/// Serializes a document with records in ascending key order.
///
/// The sort is unconditional and ordinal (byte-wise, no collation): every
/// write canonicalizes the record section even when nothing changed. The
/// requested line-ending mode is applied to the whole output last, so no
/// mixed endings can escape.
pub fn serialize(doc: &Document, eol: LineEnding) -> String {
    let mut records: Vec<&Record> = doc.records.iter().collect();
    records.sort_by(|a, b| a.key.cmp(&b.key));

    let mut out = String::with_capacity(doc.prologue.len() + doc.epilogue.len() + 128);
    out.push_str(&doc.prologue);
    for record in records {
        out.push_str("  <data name=\"");
        out.push_str(&escape_attr(&record.key));
        out.push('"');
        if record.preserve_space {
            out.push_str(" xml:space=\"preserve\"");
        }
        out.push_str(">\n    <value>");
        out.push_str(&escape_text(&record.value));
        out.push_str("</value>\n  </data>\n");
    }
    out.push_str(&doc.epilogue);
    eol.apply(&out)
}

/// Finds the next `<data` element start at or after `from`.
///
/// Comment regions are skipped: the stock resource-file header carries a
/// large comment that quotes `<data>` examples, and those must not parse as
/// records.
fn find_data_open(text: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let rest = &text[pos..];
        let data = rest.find(DATA_OPEN)?;
        match rest.find(COMMENT_OPEN) {
            Some(comment) if comment < data => {
                // Skip to the end of the comment; an unterminated comment
                // swallows everything after it.
                let close = text[pos + comment..].find(COMMENT_CLOSE)?;
                pos = pos + comment + close + COMMENT_CLOSE.len();
            }
            _ => {
                let at = pos + data;
                match text.as_bytes().get(at + DATA_OPEN.len()).copied() {
                    // A real element boundary, not a longer tag name
                    Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'>') | Some(b'/') => {
                        return Some(at)
                    }
                    _ => pos = at + DATA_OPEN.len(),
                }
            }
        }
    }
}

/// Start of the passthrough/record boundary for an element at `at`.
///
/// Normally the element sits alone on its line and the boundary is the line
/// start, so the serializer owns the indentation. If non-whitespace precedes
/// the element on the same line, that text stays in the passthrough region.
fn block_start(text: &str, at: usize) -> usize {
    let line = text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if text[line..at].trim().is_empty() {
        line
    } else {
        at
    }
}

/// Extracts a quoted attribute value from a tag's attribute text.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let mut search = 0;
    while let Some(found) = attrs[search..].find(name) {
        let at = search + found;
        let preceded_ok = at == 0 || attrs[..at].ends_with(|c: char| c.is_whitespace());
        let rest = attrs[at + name.len()..].trim_start();
        if preceded_ok {
            if let Some(rest) = rest.strip_prefix('=') {
                let rest = rest.trim_start();
                let mut chars = rest.chars();
                if let Some(quote @ ('"' | '\'')) = chars.next() {
                    let inner = &rest[1..];
                    let end = inner.find(quote)?;
                    return Some(inner[..end].to_string());
                }
            }
        }
        search = at + name.len();
    }
    None
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

// Replacing `&amp;` last makes this the exact inverse of the escapers:
// after escaping, the only `&` bytes left introduce entities.
fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn parse_err(path: &Path, reason: &str) -> LoclabError {
    LoclabError::Parse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
