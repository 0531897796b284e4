//! Thresholds and tables for the heading extractor, summarizer and filters.
//!
//! Every component owns its own copy; nothing here is process-global.

use docgist_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language codes written right-to-left.
pub const DEFAULT_RTL_LANGS: &[&str] = &["ar", "dv", "fa", "ha", "he", "ks", "ps", "ur", "yi"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// How many of the largest distinct font sizes count as heading fonts.
    pub font_sizes: usize,
    /// Keep accepting fragments while fewer than this many were taken...
    pub min_fragments: usize,
    /// ...or while fewer than this many words were collected.
    pub min_words: usize,
    /// Fragments with more words than this are cut to `max_fragment_words - 1` words.
    pub max_fragment_words: usize,
    pub rtl_languages: Vec<String>,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            font_sizes: 3,
            min_fragments: 3,
            min_words: 10,
            max_fragment_words: 30,
            rtl_languages: DEFAULT_RTL_LANGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HeadingConfig {
    pub fn is_rtl(&self, lang: &str) -> bool {
        let lang = lang.trim();
        self.rtl_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(lang))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Sentences per summary when the caller does not ask for a specific count.
    pub sentences: usize,
    pub max_candidates: usize,
    pub min_sentence_chars: usize,
    pub max_sentence_chars: usize,
    /// Lines scanned by the heading-from-text fallback.
    pub max_heading_lines: usize,
    pub min_heading_chars: usize,
    pub max_heading_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sentences: 5,
            max_candidates: 500,
            min_sentence_chars: 20,
            max_sentence_chars: 400,
            max_heading_lines: 20,
            min_heading_chars: 15,
            max_heading_chars: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// PDF body text must be longer than this before the text heading fallback runs.
    pub text_heading_min_chars: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            text_heading_min_chars: 4000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgistConfig {
    pub heading: HeadingConfig,
    pub summary: SummaryConfig,
    pub filter: FilterConfig,
}

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_usize(key: &str) -> Option<usize> {
    env(key).and_then(|s| s.parse::<usize>().ok())
}

impl DocgistConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Overrides:
    /// - DOCGIST_SUMMARY_SENTENCES
    /// - DOCGIST_RTL_LANGS (comma-separated)
    /// - DOCGIST_TEXT_HEADING_MIN_CHARS
    pub fn apply_env(&mut self) {
        if let Some(n) = env_usize("DOCGIST_SUMMARY_SENTENCES") {
            self.summary.sentences = n;
        }
        if let Some(langs) = env("DOCGIST_RTL_LANGS") {
            self.heading.rtl_languages = langs
                .split(',')
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(n) = env_usize("DOCGIST_TEXT_HEADING_MIN_CHARS") {
            self.filter.text_heading_min_chars = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that mutate them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_documented_thresholds() {
        let cfg = DocgistConfig::default();
        assert_eq!(cfg.summary.sentences, 5);
        assert_eq!(cfg.summary.max_candidates, 500);
        assert_eq!(cfg.summary.min_sentence_chars, 20);
        assert_eq!(cfg.summary.max_sentence_chars, 400);
        assert_eq!(cfg.heading.font_sizes, 3);
        assert_eq!(cfg.heading.max_fragment_words, 30);
        assert_eq!(cfg.filter.text_heading_min_chars, 4000);
    }

    #[test]
    fn rtl_lookup_is_case_insensitive() {
        let cfg = HeadingConfig::default();
        assert!(cfg.is_rtl("he"));
        assert!(cfg.is_rtl("AR"));
        assert!(!cfg.is_rtl("en"));
        assert!(!cfg.is_rtl(""));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"summary": {{"sentences": 2}}}}"#).unwrap();
        let cfg = DocgistConfig::from_json_file(f.path()).unwrap();
        assert_eq!(cfg.summary.sentences, 2);
        assert_eq!(cfg.summary.max_sentence_chars, 400);
        assert_eq!(cfg.heading, HeadingConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{not json").unwrap();
        let err = DocgistConfig::from_json_file(f.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn env_overrides_apply() {
        let _g = ENV_LOCK.lock().unwrap();
        std::env::set_var("DOCGIST_SUMMARY_SENTENCES", "3");
        std::env::set_var("DOCGIST_RTL_LANGS", "he, AR ,");
        std::env::set_var("DOCGIST_TEXT_HEADING_MIN_CHARS", "not-a-number");
        let cfg = DocgistConfig::from_env();
        std::env::remove_var("DOCGIST_SUMMARY_SENTENCES");
        std::env::remove_var("DOCGIST_RTL_LANGS");
        std::env::remove_var("DOCGIST_TEXT_HEADING_MIN_CHARS");

        assert_eq!(cfg.summary.sentences, 3);
        assert_eq!(cfg.heading.rtl_languages, vec!["he", "ar"]);
        assert_eq!(cfg.filter.text_heading_min_chars, 4000);
    }
}
