use serde::Serialize;

/// Line-break convention of one resource file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Crlf,
    Lf,
}

impl LineEnding {
    /// Detects the convention from raw file text.
    ///
    /// CRLF wins whenever a `\r\n` sequence is present; a file with no line
    /// break at all defaults to CRLF (the legacy convention of the format).
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else if text.contains('\n') {
            LineEnding::Lf
        } else {
            LineEnding::Crlf
        }
    }

    /// Expands LF-normalized text into this convention.
    ///
    /// Applies to every line break, including ones the serializer introduced,
    /// so the output never mixes endings.
    pub fn apply(self, text: &str) -> String {
        match self {
            LineEnding::Lf => text.to_string(),
            LineEnding::Crlf => text.replace('\n', "\r\n"),
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        LineEnding::Crlf
    }
}

/// One key/value entry in a resource document
///
/// Keys are case-sensitive and unique within a document. Values are stored
/// LF-normalized and may span multiple lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
    /// `xml:space="preserve"` marker: literal whitespace in the value must
    /// survive serialization untouched
    pub preserve_space: bool,
}

/// In-memory form of one resource file
///
/// `prologue` (header, resheaders, schema, assembly aliases) and `epilogue`
/// (normally the closing `</root>`) are never interpreted; they are carried
/// verbatim so a round trip only ever rewrites the record section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub prologue: String,
    pub records: Vec<Record>,
    pub epilogue: String,
}
