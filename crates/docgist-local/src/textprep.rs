//! Minimal, deterministic text normalization helpers.
//!
//! These are display-safe: they only drop junk (links, control characters, replacement
//! characters) and squeeze whitespace. Nothing here lowercases or folds text.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::{is_nfkc, UnicodeNormalization};

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[-a-zA-Z0-9+&@#/%?=~_|!:,.;]*[-a-zA-Z0-9+&@#/%=~_|]")
        .expect("static url pattern")
});
static RE_NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{C}").expect("static category pattern"));

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace `http(s)://` links with a space.
pub fn strip_urls(s: &str) -> String {
    RE_URL.replace_all(s, " ").into_owned()
}

/// Replace control, format, private-use and unassigned code points with a space.
pub fn strip_non_printable(s: &str) -> String {
    RE_NON_PRINTABLE.replace_all(s, " ").into_owned()
}

/// Post-process a generated summary: links out, non-printables out, whitespace squeezed.
///
/// Idempotent: `clean_summary(&clean_summary(x)) == clean_summary(x)`.
pub fn clean_summary(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    collapse_ws(&strip_non_printable(&strip_urls(s)))
}

/// Drop U+FFFD replacement characters left behind by lossy decoding.
pub fn clean_field(s: &str) -> String {
    s.replace('\u{FFFD}', "")
}

/// Turn a right-to-left heading captured in visual order back into logical order.
///
/// PDF readers hand out RTL glyphs left to right, so the string is reversed by character.
/// Scripts like Arabic are often stored as presentation-form glyphs; those are folded with
/// NFKC when the reversed string is not already normalized.
pub fn rtl_to_logical(s: &str) -> String {
    let reversed: String = s.chars().rev().collect();
    if is_nfkc(&reversed) {
        reversed
    } else {
        reversed.nfkc().collect()
    }
}
