use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("extract failed: {0}")]
    Extract(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Metadata keys shared between the parse and index stages.
pub mod keys {
    pub const HEADING: &str = "heading";
    pub const SUMMARY: &str = "summary";
    pub const PAGES: &str = "pages";
    pub const LANGUAGE: &str = "lang";
    pub const LAST_MODIFIED: &str = "Last-Modified";
    pub const DESCRIPTION: &str = "metatag.description";
    pub const TWITTER_DESCRIPTION: &str = "metatag.twitter:description";
    pub const TITLE: &str = "title";
    pub const ANCHOR: &str = "anchor";
    pub const CONTENT_LENGTH: &str = "contentLength";
    pub const TITLE_LENGTH: &str = "titleLength";
    pub const HEADING_LENGTH: &str = "headingLength";
    pub const ANCHOR_LENGTH: &str = "anchorLength";

    /// Side-channel keys emitted by the upstream PDF reader.
    pub const NPAGES: &str = "xmptpg:npages";
    pub const CREATED: &str = "created";
    pub const MODIFIED: &str = "modified";
}

pub const PDF_MIME: &str = "application/pdf";

/// Multi-valued string metadata (parse metadata or index document fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn values(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), vec![value.into()]);
    }

    /// Append `value` to `key`.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.fields
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.fields.remove(key)
    }

    /// All values of `key` concatenated, or `None` when the key is absent.
    pub fn joined(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(|v| v.concat())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One `[<index> <size>]<text>` run of a tagged text stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSpan {
    /// Encounter order assigned by the upstream reader.
    pub index: u64,
    pub font_size: f32,
    pub text: String,
}

/// Where a heading came from. Rendered as a rubric suffix so consumers can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    PdfFonts,
    PdfText,
}

impl Provenance {
    pub fn rubric(&self) -> &'static str {
        match self {
            Self::PdfFonts => "[from PDF fonts]",
            Self::PdfText => "[from PDF text]",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rubric())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub provenance: Provenance,
}

impl Heading {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    /// The value stored under the `heading` metadata key.
    pub fn tagged(&self) -> String {
        format!("{} {}", self.text, self.provenance.rubric())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentence {
    /// Reading order within the source text.
    pub index: usize,
    pub text: String,
    pub word_count: usize,
    /// Sum of word-overlap similarities against every sentence, itself included.
    pub score: f64,
}

pub const SUMMARY_SEPARATOR: &str = " [...] ";

/// Selected sentences in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub sentences: Vec<Sentence>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn to_text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR)
            .trim()
            .to_string()
    }
}

/// A parsed document as handed over by the upstream parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub url: String,
    pub content_type: Option<String>,
    /// Plain body text (markup already stripped).
    pub text: String,
    /// First-page tagged text stream from the PDF reader, when available.
    pub tagged_text: Option<String>,
    /// Side-channel document metadata from the reader (`xmptpg:npages`, `created`, ...).
    pub doc_meta: Metadata,
    /// Parse metadata; parse filters write derived fields here.
    pub parse_meta: Metadata,
}

impl ParsedDocument {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_MIME))
            .unwrap_or(false)
    }
}

/// Parse-time hook: derive fields from a parsed document into its parse metadata.
pub trait ParseFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn filter(&self, doc: &mut ParsedDocument);
}

/// Index-time hook: shape the fields of the output index document.
pub trait IndexingFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn filter(&self, parsed: &ParsedDocument, fields: &mut Metadata);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_into_core_error() {
        fn open_missing() -> Result<Vec<u8>> {
            Ok(std::fs::read("/nonexistent/docgist/body.pdf")?)
        }
        let err = open_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("io error: "));
        assert_eq!(
            Error::Config("bad json".to_string()).to_string(),
            "invalid config: bad json"
        );
    }

    #[test]
    fn metadata_joined_concatenates_values() {
        let mut m = Metadata::new();
        m.add(keys::TITLE, "Annual ");
        m.add(keys::TITLE, "Report");
        assert_eq!(m.joined(keys::TITLE).as_deref(), Some("Annual Report"));
        assert_eq!(m.get(keys::TITLE), Some("Annual "));
        assert_eq!(m.joined(keys::ANCHOR), None);
    }

    #[test]
    fn metadata_set_replaces_values() {
        let mut m = Metadata::new();
        m.add(keys::PAGES, "1");
        m.add(keys::PAGES, "2");
        m.set(keys::PAGES, "7");
        assert_eq!(m.values(keys::PAGES), ["7".to_string()]);
    }

    #[test]
    fn heading_tagged_appends_rubric() {
        let h = Heading::new("Big Title", Provenance::PdfFonts);
        assert_eq!(h.tagged(), "Big Title [from PDF fonts]");
        let h = Heading::new("Some Report Title", Provenance::PdfText);
        assert_eq!(h.tagged(), "Some Report Title [from PDF text]");
    }

    #[test]
    fn summary_joins_with_separator() {
        let s = Summary {
            sentences: vec![
                Sentence {
                    index: 0,
                    text: "First sentence here.".to_string(),
                    word_count: 3,
                    score: 1.0,
                },
                Sentence {
                    index: 2,
                    text: "Third sentence here.".to_string(),
                    word_count: 3,
                    score: 1.0,
                },
            ],
        };
        assert_eq!(s.to_text(), "First sentence here. [...] Third sentence here.");
    }

    #[test]
    fn is_pdf_ignores_case_and_padding() {
        let doc = ParsedDocument {
            content_type: Some(" Application/PDF ".to_string()),
            ..Default::default()
        };
        assert!(doc.is_pdf());
        let doc = ParsedDocument {
            content_type: Some("text/html".to_string()),
            ..Default::default()
        };
        assert!(!doc.is_pdf());
    }

    #[test]
    fn metadata_serializes_as_plain_map() {
        let mut m = Metadata::new();
        m.set(keys::SUMMARY, "x");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"summary": ["x"]}));
    }
}
