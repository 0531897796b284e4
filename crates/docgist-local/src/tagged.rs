//! Reader for the font-tagged text stream emitted by the upstream PDF reader.
//!
//! Format: `[<index> <size>]<text>` where `<size>` has two or three integer digits and a
//! fractional part (only fonts of 10pt and up are tagged). Text runs until the next `[`.

use docgist_core::TaggedSpan;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+) (\d{2,3}\.\d+)\]([^\[]*)").expect("static tag pattern")
});

/// All tagged spans in encounter order. Tags whose numbers do not parse are skipped.
pub fn scan(tagged: &str) -> Vec<TaggedSpan> {
    RE_TAG
        .captures_iter(tagged)
        .filter_map(|c| {
            let index = c.get(1)?.as_str().parse::<u64>().ok()?;
            let font_size = c.get(2)?.as_str().parse::<f32>().ok()?;
            if !font_size.is_finite() {
                return None;
            }
            Some(TaggedSpan {
                index,
                font_size,
                text: c.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
            })
        })
        .collect()
}

/// The `n` largest distinct font sizes, largest first.
pub fn largest_font_sizes(spans: &[TaggedSpan], n: usize) -> Vec<f32> {
    let mut sizes: Vec<f32> = spans.iter().map(|s| s.font_size).collect();
    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();
    sizes.truncate(n);
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_reads_index_size_and_text() {
        let spans = scan("[0 36.0]Big Title[1 24.0]Subtitle Text Here");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].index, 0);
        assert_eq!(spans[0].font_size, 36.0);
        assert_eq!(spans[0].text, "Big Title");
        assert_eq!(spans[1].index, 1);
        assert_eq!(spans[1].font_size, 24.0);
        assert_eq!(spans[1].text, "Subtitle Text Here");
    }

    #[test]
    fn scan_ignores_text_before_first_tag_and_untagged_brackets() {
        let spans = scan("preamble [x] [3 9.5]tiny [4 100.5]Huge");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].font_size, 100.5);
        assert_eq!(spans[0].text, "Huge");
    }

    #[test]
    fn scan_keeps_empty_runs_for_size_collection() {
        let spans = scan("[0 48.0][1 12.0]body");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "");
    }

    #[test]
    fn scan_skips_unparseable_index() {
        let spans = scan("[99999999999999999999999 20.0]Overflow[1 20.0]Kept");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Kept");
    }

    #[test]
    fn scan_of_empty_input_is_empty() {
        assert!(scan("").is_empty());
        assert!(scan("no tags at all").is_empty());
    }

    #[test]
    fn largest_font_sizes_are_distinct_and_descending() {
        let spans = scan("[0 12.0]a[1 36.0]b[2 12.0]c[3 24.0]d[4 18.0]e[5 36.0]f");
        assert_eq!(largest_font_sizes(&spans, 3), vec![36.0, 24.0, 18.0]);
        assert_eq!(largest_font_sizes(&spans, 10), vec![36.0, 24.0, 18.0, 12.0]);
    }
}
