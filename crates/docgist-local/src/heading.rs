//! Title inference from font sizes.
//!
//! The upstream reader tags every run of large text on the first page with its font size.
//! Runs set in one of the few largest sizes are taken, in reading order, as the heading
//! block: title first, then subtitle or byline.

use crate::config::HeadingConfig;
use crate::tagged;
use crate::textprep;
use docgist_core::{Heading, Provenance, TaggedSpan};

#[derive(Debug, Clone, Default)]
pub struct HeadingExtractor {
    cfg: HeadingConfig,
}

impl HeadingExtractor {
    pub fn new(cfg: HeadingConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &HeadingConfig {
        &self.cfg
    }

    /// Heading text assembled from a tagged stream; empty when nothing qualifies.
    pub fn heading_from_tagged(&self, tagged: &str) -> String {
        self.heading_from_spans(&tagged::scan(tagged))
    }

    pub fn heading_from_spans(&self, spans: &[TaggedSpan]) -> String {
        let heading_sizes = tagged::largest_font_sizes(spans, self.cfg.font_sizes);

        let mut out = String::new();
        let mut fragments = 0usize;
        let mut words = 0usize;
        let mut last_size: Option<f32> = None;

        for span in spans {
            if fragments >= self.cfg.min_fragments && words >= self.cfg.min_words {
                break;
            }
            if !heading_sizes.contains(&span.font_size) {
                continue;
            }
            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }

            let mut fragment_words: Vec<&str> = text.split_whitespace().collect();
            if !out.is_empty() {
                out.push(' ');
                // A size switch into a multi-word run reads as a subtitle or byline.
                if last_size != Some(span.font_size) && fragment_words.len() > 1 {
                    out.push_str("- ");
                }
            }
            if fragment_words.len() > self.cfg.max_fragment_words {
                fragment_words.truncate(self.cfg.max_fragment_words.saturating_sub(1));
                out.push_str(&fragment_words.join(" "));
            } else {
                out.push_str(text);
            }

            fragments += 1;
            words += fragment_words.len();
            last_size = Some(span.font_size);
        }

        out.trim().to_string()
    }

    /// Font-based heading for a document, in logical reading order.
    ///
    /// `language` is the detected document language; right-to-left languages get their
    /// heading reversed and NFKC-normalized.
    pub fn extract(&self, tagged: &str, language: Option<&str>) -> Option<Heading> {
        let text = self.heading_from_tagged(tagged);
        if text.is_empty() {
            return None;
        }
        let text = match language {
            Some(lang) if self.cfg.is_rtl(lang) => textprep::rtl_to_logical(&text),
            _ => text,
        };
        Some(Heading::new(text, Provenance::PdfFonts))
    }
}

/// Page count from the reader's side-channel value, falling back to 1 for any document
/// that produced body text.
pub fn page_count(npages: Option<&str>, body_text: &str) -> Option<u32> {
    match npages.and_then(|s| s.trim().parse::<u32>().ok()) {
        Some(n) if n > 0 => Some(n),
        _ if !body_text.trim().is_empty() => Some(1),
        _ => None,
    }
}
