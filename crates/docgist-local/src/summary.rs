//! Extractive summaries by lexical centrality.
//!
//! Every sentence is compared with every other by counting shared words; the sentences that
//! overlap most with the rest of the document are taken as its summary, in reading order.
//! Deterministic, no models, no dictionaries.

use crate::config::SummaryConfig;
use docgist_core::{Heading, Provenance, Sentence, Summary};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_MISSING_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\p{Lu})").expect("static break pattern"));

/// Lowercased word counts for one sentence.
#[derive(Debug, Clone, Default)]
struct WordBag {
    counts: HashMap<String, usize>,
    total: usize,
}

impl WordBag {
    fn new(text: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;
        for w in text.split_whitespace() {
            *counts.entry(w.to_lowercase()).or_default() += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// Number of equal (word, word) pairs across both sentences, repeats included.
    ///
    /// Same value as comparing every word of one sentence against every word of the other.
    fn common(&self, other: &WordBag) -> usize {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .counts
            .iter()
            .map(|(w, n)| n * large.counts.get(w).copied().unwrap_or(0))
            .sum()
    }
}

/// Pairwise word-overlap scores, indexed by sentence position.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    fn build(bags: &[WordBag]) -> Self {
        let n = bags.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let denom = (bags[i].total + bags[j].total) as f64 / 2.0;
                let sim = if denom > 0.0 {
                    bags[i].common(&bags[j]) as f64 / denom
                } else {
                    0.0
                };
                cells[i * n + j] = sim;
                cells[j * n + i] = sim;
            }
        }
        Self { n, cells }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    /// Row sum, the diagonal included.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.cells[i * self.n..(i + 1) * self.n].iter().sum()
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// Split at `.`/`?` that closes a run of 2+ non-space characters and is followed by
/// whitespace. The terminator stays with its sentence; text past `max` candidates is dropped.
fn split_candidates(text: &str, max: usize) -> Vec<&str> {
    let mut out = Vec::new();
    if max == 0 {
        return out;
    }
    let mut start = 0usize;
    let mut run = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch.is_whitespace() {
            run = 0;
            continue;
        }
        run += 1;
        if (ch == '.' || ch == '?') && run >= 2 {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    let end = i + ch.len_utf8();
                    out.push(&text[start..end]);
                    start = end;
                    if out.len() >= max {
                        return out;
                    }
                }
            }
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    cfg: SummaryConfig,
}

impl Summarizer {
    pub fn new(cfg: SummaryConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.cfg
    }

    /// Repair sentence breaks lost in PDF extraction (`end.Next` -> `end. Next`).
    pub fn prepare(&self, text: &str) -> String {
        RE_MISSING_BREAK.replace_all(text, ". ${1}").into_owned()
    }

    /// Candidate sentences in reading order, bounded in count and length. Scores are zero.
    pub fn sentences(&self, text: &str) -> Vec<Sentence> {
        let prepared = self.prepare(text);
        let mut out = Vec::new();
        for raw in split_candidates(&prepared, self.cfg.max_candidates) {
            let trimmed = raw.trim();
            if trimmed.chars().count() < self.cfg.min_sentence_chars {
                continue;
            }
            let text = truncate_chars(trimmed, self.cfg.max_sentence_chars).to_string();
            out.push(Sentence {
                index: out.len(),
                word_count: text.split_whitespace().count(),
                text,
                score: 0.0,
            });
        }
        out
    }

    /// Fill in every sentence's score; returns the matrix the scores came from.
    pub fn score(&self, sentences: &mut [Sentence]) -> SimilarityMatrix {
        let bags: Vec<WordBag> = sentences.iter().map(|s| WordBag::new(&s.text)).collect();
        let matrix = SimilarityMatrix::build(&bags);
        for (i, s) in sentences.iter_mut().enumerate() {
            s.score = matrix.row_sum(i);
        }
        matrix
    }

    /// The `count` most central sentences, in reading order.
    pub fn summarize_sentences(&self, text: &str, count: usize) -> Summary {
        let mut sentences = self.sentences(text);
        self.score(&mut sentences);

        // Stable: equal scores keep reading order.
        sentences.sort_by(|a, b| b.score.total_cmp(&a.score));
        sentences.truncate(count);
        sentences.sort_by_key(|s| s.index);

        tracing::debug!(
            selected = sentences.len(),
            requested = count,
            "extractive summary"
        );
        Summary { sentences }
    }

    /// Summary text: selected sentences joined with `" [...] "`. Empty for empty input.
    pub fn summarize(&self, text: &str, count: usize) -> String {
        self.summarize_sentences(text, count).to_text()
    }

    /// First reasonably sized line near the top of the text, as a fallback title.
    ///
    /// Gives up at the first overlong line: past that point we are in body paragraphs.
    pub fn extract_heading(&self, text: &str) -> Option<Heading> {
        let prepared = self.prepare(text);
        for line in prepared.split('\n').take(self.cfg.max_heading_lines) {
            let line = line.trim();
            let n = line.chars().count();
            if n > self.cfg.max_heading_chars {
                return None;
            }
            if n >= self.cfg.min_heading_chars {
                return Some(Heading::new(line, Provenance::PdfText));
            }
        }
        None
    }
}
