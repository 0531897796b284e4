//! Parse-time and index-time filters that write headings, page counts and summaries into
//! document metadata.

use crate::config::{DocgistConfig, FilterConfig};
use crate::heading::{page_count, HeadingExtractor};
use crate::summary::Summarizer;
use crate::textprep;
use docgist_core::{keys, IndexingFilter, Metadata, ParseFilter, ParsedDocument};

/// Font-based heading, page count and PDF dates for PDF documents.
#[derive(Debug, Clone, Default)]
pub struct HeadingsParseFilter {
    extractor: HeadingExtractor,
}

impl HeadingsParseFilter {
    pub fn new(extractor: HeadingExtractor) -> Self {
        Self { extractor }
    }
}

impl ParseFilter for HeadingsParseFilter {
    fn name(&self) -> &'static str {
        "parse-headings"
    }

    fn filter(&self, doc: &mut ParsedDocument) {
        if !doc.is_pdf() {
            return;
        }

        if let Some(tagged) = doc.tagged_text.as_deref() {
            let lang = doc.parse_meta.get(keys::LANGUAGE).map(str::to_string);
            if let Some(heading) = self.extractor.extract(tagged, lang.as_deref()) {
                tracing::debug!(url = %doc.url, heading = %heading.text, "font heading");
                doc.parse_meta.set(keys::HEADING, heading.tagged());
            }
        }

        if let Some(pages) = page_count(doc.doc_meta.get(keys::NPAGES), &doc.text) {
            tracing::debug!(url = %doc.url, pages, "page count");
            doc.parse_meta.set(keys::PAGES, pages.to_string());
        }

        // Prefer the PDF's own dates over the web server's Last-Modified.
        let modified = doc
            .doc_meta
            .get(keys::CREATED)
            .or_else(|| doc.doc_meta.get(keys::MODIFIED))
            .map(str::to_string);
        if let Some(m) = modified {
            doc.parse_meta.set(keys::LAST_MODIFIED, m);
        }
    }
}

/// Summary, text-heading fallback and field-length bookkeeping for the index document.
#[derive(Debug, Clone, Default)]
pub struct SummaryIndexingFilter {
    summarizer: Summarizer,
    cfg: FilterConfig,
}

impl SummaryIndexingFilter {
    pub fn new(summarizer: Summarizer, cfg: FilterConfig) -> Self {
        Self { summarizer, cfg }
    }

    fn existing_summary(fields: &Metadata) -> String {
        [keys::SUMMARY, keys::DESCRIPTION, keys::TWITTER_DESCRIPTION]
            .iter()
            .find_map(|k| fields.joined(k))
            .unwrap_or_default()
    }

    fn joined_len(fields: &Metadata, key: &str) -> usize {
        fields
            .joined(key)
            .map(|s| s.chars().count())
            .unwrap_or(0)
    }
}

impl IndexingFilter for SummaryIndexingFilter {
    fn name(&self) -> &'static str {
        "text-summarizer"
    }

    fn filter(&self, parsed: &ParsedDocument, fields: &mut Metadata) {
        if Self::existing_summary(fields).is_empty() {
            fields.remove(keys::SUMMARY);
            fields.remove(keys::DESCRIPTION);
            fields.remove(keys::TWITTER_DESCRIPTION);

            let body = textprep::clean_field(&parsed.text);
            let summary = self
                .summarizer
                .summarize(&body, self.summarizer.config().sentences);
            if !summary.is_empty() {
                let summary = textprep::clean_summary(&summary);
                tracing::debug!(url = %parsed.url, chars = summary.len(), "generated summary");
                fields.add(keys::SUMMARY, summary);
            }
        }

        if !fields.contains(keys::HEADING)
            && parsed.is_pdf()
            && parsed.text.chars().count() > self.cfg.text_heading_min_chars
        {
            let body = textprep::clean_field(&parsed.text);
            if let Some(heading) = self.summarizer.extract_heading(&body) {
                tracing::debug!(url = %parsed.url, heading = %heading.text, "text heading");
                fields.add(keys::HEADING, heading.tagged());
            }
        }

        if !fields.contains(keys::CONTENT_LENGTH) && !parsed.text.is_empty() {
            fields.add(keys::CONTENT_LENGTH, parsed.text.chars().count().to_string());
        }

        let title_len = Self::joined_len(fields, keys::TITLE);
        let heading_len = Self::joined_len(fields, keys::HEADING);
        let anchor_len = Self::joined_len(fields, keys::ANCHOR);
        fields.add(keys::TITLE_LENGTH, title_len.to_string());
        fields.add(keys::HEADING_LENGTH, heading_len.to_string());
        fields.add(keys::ANCHOR_LENGTH, anchor_len.to_string());
    }
}

/// Parse filter, metadata hand-over, then indexing filter: what the crawler's parse and
/// index stages do to one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    parse: HeadingsParseFilter,
    index: SummaryIndexingFilter,
}

impl DocumentPipeline {
    pub fn new(cfg: &DocgistConfig) -> Self {
        Self {
            parse: HeadingsParseFilter::new(HeadingExtractor::new(cfg.heading.clone())),
            index: SummaryIndexingFilter::new(
                Summarizer::new(cfg.summary.clone()),
                cfg.filter.clone(),
            ),
        }
    }

    /// Run both stages; `fields` starts as whatever the index document already carries.
    pub fn run(&self, doc: &mut ParsedDocument, mut fields: Metadata) -> Metadata {
        self.parse.filter(doc);
        for key in [keys::HEADING, keys::PAGES, keys::LAST_MODIFIED] {
            if let Some(v) = doc.parse_meta.get(key) {
                if !fields.contains(key) {
                    fields.set(key, v);
                }
            }
        }
        self.index.filter(doc, &mut fields);
        fields
    }
}
